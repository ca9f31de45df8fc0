use std::path::PathBuf;
use std::time::Duration;

/// Desktop Chrome identity sent when `SHOPSCOUT_USER_AGENT` is unset.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Clone)]
pub struct ScoutConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_results: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub output_dir: PathBuf,
}

impl ScoutConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl std::fmt::Debug for ScoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoutConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "user_agent",
                &self.user_agent.chars().take(40).collect::<String>(),
            )
            .field("max_results", &self.max_results)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
