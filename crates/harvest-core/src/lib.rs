pub mod app_config;
pub mod config;
pub mod records;
pub mod site;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{AttributeValue, ItemRef, Record, DEFAULT_SCORE_MAX, UNKNOWN_NAME};
pub use site::{load_site, parse_site, ColumnNames, SiteConfig, SiteSelectors};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site file {path}: {source}")]
    SiteFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site file: {0}")]
    SiteFileParse(#[from] serde_yaml::Error),

    #[error("site config validation failed: {0}")]
    Validation(String),
}
