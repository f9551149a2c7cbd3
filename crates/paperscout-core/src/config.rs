use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::OutputSchema;

/// Root configuration, loaded from `~/.config/paperscout/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub source: SourceConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

/// Where the listing lives and how requests identify themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub category: String,
    pub listing: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pause after each detail fetch, in milliseconds.
    pub delay_ms: u64,
    pub schema: OutputSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://arxiv.org".to_string(),
            category: "cs.CR".to_string(),
            listing: "recent".to_string(),
            user_agent: "Mozilla/5.0 (compatible; ArxivWebCrawler/3.0)".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1200,
            schema: OutputSchema::Full,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "arxiv__cr.csv".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl ScoutConfig {
    /// Standard config file path: `~/.config/paperscout/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PAPERSCOUT_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("paperscout")
            .join("config.toml")
    }

    /// Load config from `path`, falling back to defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    // ─── Derived values ────────────────────────────────────

    /// `{base_url}/list/{category}/{listing}`
    pub fn listing_url(&self) -> String {
        format!(
            "{}/list/{}/{}",
            self.source.base_url.trim_end_matches('/'),
            self.source.category.trim_matches('/'),
            self.source.listing.trim_matches('/'),
        )
    }

    pub fn base_url(&self) -> &str {
        self.source.base_url.trim_end_matches('/')
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.pipeline.delay_ms)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = ScoutConfig::default();
        assert_eq!(cfg.source.base_url, "https://arxiv.org");
        assert_eq!(cfg.pipeline.delay_ms, 1200);
        assert_eq!(cfg.pipeline.schema, OutputSchema::Full);
        assert_eq!(cfg.listing_url(), "https://arxiv.org/list/cs.CR/recent");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = ScoutConfig::default();
        cfg.source.category = "cs.LG".to_string();
        cfg.pipeline.schema = OutputSchema::Reduced;
        cfg.save_to(&path).unwrap();

        let loaded = ScoutConfig::load_from(&path).unwrap();
        assert_eq!(loaded.source.category, "cs.LG");
        assert_eq!(loaded.pipeline.schema, OutputSchema::Reduced);
        assert_eq!(loaded.output.path, cfg.output.path);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\ndelay_ms = 1500\n").unwrap();

        let cfg = ScoutConfig::load_from(&path).unwrap();
        assert_eq!(cfg.delay(), Duration::from_millis(1500));
        assert_eq!(cfg.pipeline.schema, OutputSchema::Full);
        assert_eq!(cfg.source.user_agent, SourceConfig::default().user_agent);
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\nschema = \"wide\"\n").unwrap();

        assert!(ScoutConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg =
            ScoutConfig::load_from(Path::new("/tmp/nonexistent_paperscout_config.toml")).unwrap();
        assert_eq!(cfg.source.category, "cs.CR");
    }

    #[test]
    fn test_listing_url_trims_slashes() {
        let mut cfg = ScoutConfig::default();
        cfg.source.base_url = "http://127.0.0.1:1234/".to_string();
        cfg.source.category = "/math.CO/".to_string();
        cfg.source.listing = "new".to_string();
        assert_eq!(cfg.listing_url(), "http://127.0.0.1:1234/list/math.CO/new");
        assert_eq!(cfg.base_url(), "http://127.0.0.1:1234");
    }
}
