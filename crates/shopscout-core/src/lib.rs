pub mod app_config;
pub mod compare;
pub mod config;
pub mod persist;
pub mod record;

use thiserror::Error;

pub use app_config::{ScoutConfig, DEFAULT_USER_AGENT};
pub use config::{load_config, load_config_from_env};
pub use persist::{read_records_json, records_to_json, write_records_json};
pub use record::{
    or_unavailable, AmazonFlags, FlipkartFlags, ProductRecord, Site, SiteFlags, UNAVAILABLE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[source] serde_json::Error),
}
