use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Core(#[from] paperscout_core::CoreError),
}

impl ScoutError {
    /// Transport-level failures (unreachable host, non-success status).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
