use thiserror::Error;

/// Failure reported by a [`crate::PageDriver`] implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to start browser session at {url}: {reason}")]
    Session { url: String, reason: String },

    #[error("browser command failed: {0}")]
    Command(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("timed out after {after_ms}ms waiting for {what}")]
    Timeout { what: String, after_ms: u64 },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("catalog discovery interrupted: {source}")]
    DiscoveryInterrupted {
        #[source]
        source: DriverError,
    },

    #[error("navigation to {url} failed: {source}")]
    DetailNavigationFailed {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("attribute extraction failed for {url}: {source}")]
    DetailExtractionFailed {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to write export file {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("browser session error: {0}")]
    Session(#[from] DriverError),
}
