#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
