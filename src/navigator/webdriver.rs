//! WebDriver navigator
//!
//! Drives a real browser through a WebDriver server (chromedriver or a
//! Selenium grid) using `fantoccini`.

use super::{Navigator, PageSnapshot};
use crate::config::BrowserConfig;
use crate::{NavResult, NavigationError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use url::Url;

/// WebDriver capability set sent when opening a session
pub type Capabilities = Map<String, Value>;

/// Chrome capabilities for a scraping session
///
/// Incognito, certificate errors ignored, a fixed user agent, and optionally
/// headless.
pub fn chrome_capabilities(config: &BrowserConfig) -> Capabilities {
    let mut args = vec![
        format!("--user-agent={}", config.user_agent),
        "--ignore-certificate-errors".to_string(),
        "--ignore-ssl-errors".to_string(),
        "--incognito".to_string(),
        "--log-level=3".to_string(),
    ];
    if config.headless {
        args.push("--headless".to_string());
    }

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-logging"],
        }),
    );
    caps
}

/// Navigator backed by a WebDriver session
pub struct WebDriverNavigator {
    client: Option<Client>,
}

impl WebDriverNavigator {
    /// Opens a new browser session on the configured WebDriver server
    pub async fn connect(config: &BrowserConfig) -> NavResult<Self> {
        tracing::info!(
            "Connecting to WebDriver at {} (headless: {})",
            config.webdriver_url,
            config.headless
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(config));
        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| NavigationError::Session(e.to_string()))?;

        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> NavResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| NavigationError::Session("session already closed".to_string()))
    }
}

#[async_trait]
impl Navigator for WebDriverNavigator {
    async fn load(&mut self, url: &Url) -> NavResult<()> {
        tracing::debug!("goto {}", url);
        self.client()?
            .goto(url.as_str())
            .await
            .map_err(|e| NavigationError::Load {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn snapshot(&mut self) -> NavResult<PageSnapshot> {
        let client = self.client()?;
        let url = client.current_url().await.map_err(|e| NavigationError::Load {
            url: String::new(),
            message: format!("cannot read current URL: {}", e),
        })?;
        let html = client.source().await.map_err(|e| NavigationError::Load {
            url: url.to_string(),
            message: format!("cannot read page source: {}", e),
        })?;
        Ok(PageSnapshot { url, html })
    }

    async fn run_script(&mut self, script: &str) -> NavResult<()> {
        self.client()?
            .execute(script, vec![])
            .await
            .map(|_| ())
            .map_err(|e| NavigationError::Script(e.to_string()))
    }

    async fn submit_search(
        &mut self,
        input_selector: &str,
        button_selector: &str,
        keyword: &str,
    ) -> NavResult<()> {
        let client = self.client()?;

        let input = client
            .find(Locator::Css(input_selector))
            .await
            .map_err(|e| element_error(input_selector, e))?;
        input
            .send_keys(keyword)
            .await
            .map_err(|e| element_error(input_selector, e))?;

        let button = client
            .find(Locator::Css(button_selector))
            .await
            .map_err(|e| element_error(button_selector, e))?;
        button
            .click()
            .await
            .map_err(|e| element_error(button_selector, e))?;

        Ok(())
    }

    async fn close(&mut self) -> NavResult<()> {
        if let Some(client) = self.client.take() {
            tracing::info!("Closing WebDriver session");
            client
                .close()
                .await
                .map_err(|e| NavigationError::Session(e.to_string()))?;
        }
        Ok(())
    }
}

fn element_error(selector: &str, e: fantoccini::error::CmdError) -> NavigationError {
    NavigationError::Element {
        selector: selector.to_string(),
        message: e.to_string(),
    }
}
