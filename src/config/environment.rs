use std::env;
use std::time::Duration;

/// Default polling cadence used by every sync surface
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    pub poll_interval_ms: u64,
    pub admin_sender_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("DINARY_API_URL")
            .map_err(|_| "DINARY_API_URL must be set".to_string())?;

        let api_token = env::var("DINARY_API_TOKEN")
            .map_err(|_| "DINARY_API_TOKEN must be set".to_string())?;

        let poll_interval_ms = match env::var("DINARY_POLL_INTERVAL_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                "DINARY_POLL_INTERVAL_MS must be a number of milliseconds".to_string()
            })?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };

        let admin_sender_id =
            env::var("DINARY_ADMIN_SENDER_ID").unwrap_or_else(|_| "admin".to_string());

        Ok(Self {
            api_base_url,
            api_token,
            poll_interval_ms,
            admin_sender_id,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
