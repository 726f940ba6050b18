//! Abstract page-driver capability consumed by discovery and extraction.
//!
//! The pipeline never talks to a browser engine directly. Production runs use
//! [`crate::WebDriverSession`]; tests substitute an in-memory fake.

use async_trait::async_trait;

use crate::error::DriverError;

/// One browser page plus the DOM queries the pipeline needs.
///
/// Every call is a blocking step from the pipeline's point of view; callers
/// bound navigation with [`crate::settle::with_timeout`].
#[async_trait]
pub trait PageDriver: Send {
    /// Handle to a rendered DOM element.
    type Element: Clone + Send + Sync;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    async fn query_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    async fn query_one(&mut self, selector: &str) -> Result<Option<Self::Element>, DriverError>;

    async fn query_all_within(
        &mut self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DriverError>;

    async fn query_one_within(
        &mut self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, DriverError>;

    /// First element whose visible text contains `text`, ignoring case.
    async fn find_by_text(&mut self, text: &str) -> Result<Option<Self::Element>, DriverError>;

    async fn is_visible(&mut self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    /// Runs `script` in the page and returns its JSON result.
    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, DriverError>;

    async fn inner_text(&mut self, element: &Self::Element) -> Result<String, DriverError>;

    /// Absolute `href` of the nearest link enclosing `element` (itself included).
    async fn enclosing_href(&mut self, element: &Self::Element)
        -> Result<Option<String>, DriverError>;

    /// Releases the session. Consumes the driver so it cannot be closed twice.
    async fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}
