use async_trait::async_trait;
use paperscout_core::ScoutConfig;

use crate::error::{Result, ScoutError};

/// Fetch a URL and return its body. One attempt, no retries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

// ─── HttpFetcher ──────────────────────────────────────────────────────────────

/// `reqwest`-backed [`Fetcher`] that sends a fixed user-agent on every request.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        Self::new(&config.source.user_agent)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScoutError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn sends_user_agent_and_returns_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/list/cs.CR/recent")
            .match_header("user-agent", "paperscout-test/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<dl></dl>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new("paperscout-test/1.0").unwrap();
        let body = fetcher
            .fetch(&format!("{}/list/cs.CR/recent", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<dl></dl>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/abs/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new("paperscout-test/1.0").unwrap();
        let err = fetcher
            .fetch(&format!("{}/abs/missing", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, ScoutError::Status { status: 404, .. }));
        assert!(err.is_network());
        // Exactly one attempt.
        m.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let fetcher = HttpFetcher::new("paperscout-test/1.0").unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, ScoutError::Http(_)));
    }

    #[test]
    fn from_config_uses_configured_agent() {
        let config = ScoutConfig::default();
        assert!(HttpFetcher::from_config(&config).is_ok());
    }
}
