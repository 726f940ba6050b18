pub mod discover;
pub mod driver;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod retry;
pub mod schema;
pub mod settle;
pub mod webdriver;

pub use discover::{CatalogDiscoverer, DiscoveryOptions, LoadReport, StopReason};
pub use driver::PageDriver;
pub use error::{DriverError, ScraperError};
pub use export::{write_csv, CsvFileExporter, Exporter};
pub use extract::{DetailExtractor, ExtractOptions};
pub use pipeline::{dedupe_item_refs, extract_all, run_pipeline, PipelineOptions, RunOutcome};
pub use retry::RetryPolicy;
pub use schema::{normalize_schema, Schema};
pub use settle::SettlePolicy;
pub use webdriver::WebDriverSession;
