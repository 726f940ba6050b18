use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime knobs read from the environment.
///
/// Site-specific selectors live in [`crate::SiteConfig`]; this struct only
/// carries session bootstrap and pipeline policy.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub site_path: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub settle_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Upper bound on "load more" activations during discovery.
    pub max_load_more: usize,
    /// Drop repeated item URLs before extraction (first occurrence wins).
    pub dedupe_urls: bool,
    /// Additional attempts per item after a navigation failure.
    pub item_retries: u32,
    pub retry_backoff_ms: u64,
}
