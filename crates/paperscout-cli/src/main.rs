use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use paperscout_core::{ExitCode, OutputSchema, ScoutConfig};
use paperscout_science::{
    FixedDelay, HttpFetcher, ListingFragment, Pipeline, PipelineObserver, RunOutcome, ScoutError,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "paperscout",
    about = "Collect recent arXiv listings, enrich them from abstract pages, export CSV",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/paperscout/config.toml or $PAPERSCOUT_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format. Also enabled by setting PAPERSCOUT_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing and write the CSV.
    Fetch {
        /// arXiv category, e.g. cs.CR.
        #[arg(long)]
        category: Option<String>,
        /// Listing page under the category: recent, new, pastweek...
        #[arg(long)]
        listing: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        /// Pause after each abstract page, in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Column layout: full or reduced.
        #[arg(long)]
        schema: Option<OutputSchema>,
        /// CSV destination.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the CSV file (useful with --json).
        #[arg(long)]
        no_save: bool,
        /// Hide the progress bar.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective config.
    Show,
    /// Print the config file path.
    Path,
    /// Write the default config to the config path.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Progress ────────────────────────────────────────────────────────────────

struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl PipelineObserver for ProgressObserver {
    fn on_listing(&self, candidates: usize) {
        self.bar.set_length(candidates as u64);
    }

    fn on_item(&self, index: usize, fragment: &ListingFragment) {
        self.bar.set_position(index as u64);
        self.bar.set_message(fragment.id.clone());
    }

    fn on_finish(&self, kept: usize) {
        self.bar.finish_with_message(format!("{kept} kept"));
    }
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("PAPERSCOUT_JSON").as_deref() == Ok("1");
    let show_progress =
        matches!(cli.command, Commands::Fetch { quiet: false, .. }) && !json_output;
    init_tracing(default_log_level(cli.verbose, show_progress));

    let config_path = cli.config.clone().unwrap_or_else(ScoutConfig::config_path);
    let mut config = match ScoutConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid config {}: {err}", config_path.display());
            std::process::exit(ExitCode::InvalidArgs as i32);
        }
    };

    match cli.command {
        Commands::Fetch {
            category,
            listing,
            base_url,
            delay_ms,
            schema,
            output,
            no_save,
            ..
        } => {
            if let Some(c) = category { config.source.category = c; }
            if let Some(l) = listing { config.source.listing = l; }
            if let Some(b) = base_url { config.source.base_url = b; }
            if let Some(d) = delay_ms { config.pipeline.delay_ms = d; }
            if let Some(s) = schema { config.pipeline.schema = s; }
            if let Some(o) = output { config.output.path = o.to_string_lossy().to_string(); }

            let fetcher = HttpFetcher::from_config(&config).context("building HTTP client")?;
            let limiter = FixedDelay::new(config.delay());
            let mut pipeline = Pipeline::from_config(fetcher, limiter, &config);
            if show_progress {
                pipeline = pipeline.with_observer(ProgressObserver::new());
            }

            let output_path = config.output_path();
            let result = if no_save {
                pipeline.run().await
            } else {
                pipeline.run_and_save(&output_path, config.pipeline.schema).await
            };
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(err) => return fail_run(err, json_output, start),
            };
            let dur = start.elapsed().as_millis();

            // An empty run is a normal outcome; it exits 0 like any success.
            let records = match outcome {
                RunOutcome::Empty => {
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "empty",
                            "data": { "items": [], "total": 0, "listing": config.listing_url() },
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        println!("No usable papers found at {}.", config.listing_url());
                    }
                    return Ok(());
                }
                RunOutcome::Emit(records) => records,
            };

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "items": records,
                        "total": records.len(),
                        "saved_to": (!no_save).then(|| output_path.display().to_string()),
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if no_save {
                for record in &records {
                    println!("{}  {}", record.id, record.title);
                }
            } else {
                println!(
                    "Saved {} papers to {} ({} schema)",
                    records.len(),
                    output_path.display(),
                    config.pipeline.schema
                );
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({ "status": "ok", "data": config }))?;
                } else {
                    print!("{}", config.to_toml_string()?);
                }
            }
            ConfigAction::Path => println!("{}", config_path.display()),
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    eprintln!(
                        "Config already exists at {}. Add --force to overwrite.",
                        config_path.display()
                    );
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
                ScoutConfig::default().save_to(&config_path)?;
                println!("Wrote {}", config_path.display());
            }
        },
    }

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Info lines on stderr would tear the progress bar, so it raises the floor to warn.
fn default_log_level(verbose: bool, show_progress: bool) -> &'static str {
    match (verbose, show_progress) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn fail_run(err: ScoutError, json_output: bool, start: Instant) -> Result<()> {
    let code = if err.is_network() {
        ExitCode::NetworkError
    } else {
        ExitCode::GeneralError
    };
    if json_output {
        print_json(&serde_json::json!({
            "status": "error",
            "error": if err.is_network() { "network" } else { "general" },
            "message": err.to_string(),
            "meta": { "duration_ms": start.elapsed().as_millis() }
        }))?;
    } else {
        eprintln!("Run failed: {err}");
    }
    std::process::exit(code as i32);
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_flags_parse() {
        let cli = Cli::parse_from([
            "paperscout", "fetch", "--category", "cs.LG", "--schema", "reduced", "--delay-ms", "1500",
        ]);
        match cli.command {
            Commands::Fetch { category, schema, delay_ms, .. } => {
                assert_eq!(category.as_deref(), Some("cs.LG"));
                assert_eq!(schema, Some(OutputSchema::Reduced));
                assert_eq!(delay_ms, Some(1500));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn progress_bar_quiets_info_logs() {
        assert_eq!(default_log_level(false, true), "warn");
        assert_eq!(default_log_level(false, false), "info");
        assert_eq!(default_log_level(true, true), "debug");
    }

    #[test]
    fn unknown_schema_is_rejected() {
        assert!(Cli::try_parse_from(["paperscout", "fetch", "--schema", "wide"]).is_err());
    }
}
