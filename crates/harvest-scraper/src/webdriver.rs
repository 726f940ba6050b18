//! [`PageDriver`] over a W3C WebDriver endpoint (geckodriver, chromedriver).

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};

use crate::driver::PageDriver;
use crate::error::DriverError;

const ENCLOSING_HREF_SCRIPT: &str = "\
const node = arguments[0];
const link = node.closest('a') || node.parentElement;
return link && link.href ? String(link.href) : null;";

impl From<CmdError> for DriverError {
    fn from(err: CmdError) -> Self {
        DriverError::Command(err.to_string())
    }
}

/// One WebDriver session driving a single browser page.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Opens a new browser session at `webdriver_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Session`] if the endpoint is unreachable or
    /// refuses the requested capabilities.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, DriverError> {
        let client = ClientBuilder::native()
            .capabilities(capabilities(headless))
            .connect(webdriver_url)
            .await
            .map_err(|e| DriverError::Session {
                url: webdriver_url.to_owned(),
                reason: e.to_string(),
            })?;
        tracing::info!(url = webdriver_url, headless, "browser session started");
        Ok(Self { client })
    }
}

fn capabilities(headless: bool) -> Map<String, Value> {
    let mut caps = Map::new();
    if headless {
        caps.insert("moz:firefoxOptions".to_owned(), json!({ "args": ["-headless"] }));
        caps.insert("goog:chromeOptions".to_owned(), json!({ "args": ["--headless=new"] }));
    }
    caps
}

/// XPath matching elements whose own text contains `text`, ignoring ASCII case.
fn text_xpath(text: &str) -> String {
    const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
    const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let needle = xpath_literal(&text.trim().to_ascii_uppercase());
    format!(
        "//*[not(self::script) and not(self::style)]\
         [contains(translate(normalize-space(text()), '{LOWER}', '{UPPER}'), {needle})]"
    )
}

/// Quotes `s` as an XPath 1.0 string literal, which has no escape syntax.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[async_trait]
impl PageDriver for WebDriverSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DriverError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    async fn query_one(&mut self, selector: &str) -> Result<Option<Element>, DriverError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all_within(
        &mut self,
        scope: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, DriverError> {
        Ok(scope.find_all(Locator::Css(selector)).await?)
    }

    async fn query_one_within(
        &mut self,
        scope: &Element,
        selector: &str,
    ) -> Result<Option<Element>, DriverError> {
        Ok(self
            .query_all_within(scope, selector)
            .await?
            .into_iter()
            .next())
    }

    async fn find_by_text(&mut self, text: &str) -> Result<Option<Element>, DriverError> {
        let xpath = text_xpath(text);
        let matches = self.client.find_all(Locator::XPath(&xpath)).await?;
        Ok(matches.into_iter().next())
    }

    async fn is_visible(&mut self, element: &Element) -> Result<bool, DriverError> {
        Ok(element.is_displayed().await?)
    }

    async fn click(&mut self, element: &Element) -> Result<(), DriverError> {
        element.click().await?;
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, DriverError> {
        self.client
            .execute(script, Vec::new())
            .await
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    async fn inner_text(&mut self, element: &Element) -> Result<String, DriverError> {
        Ok(element.text().await?)
    }

    async fn enclosing_href(&mut self, element: &Element) -> Result<Option<String>, DriverError> {
        let arg = serde_json::to_value(element).map_err(|e| DriverError::Script(e.to_string()))?;
        let value = self
            .client
            .execute(ENCLOSING_HREF_SCRIPT, vec![arg])
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(value.as_str().map(str::to_owned))
    }

    async fn close(self) -> Result<(), DriverError> {
        self.client.close().await?;
        tracing::info!("browser session closed");
        Ok(())
    }
}
