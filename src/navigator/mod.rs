//! Navigation layer
//!
//! The pipeline never talks to a browser directly. It drives a [`Navigator`],
//! which loads pages, hands back a snapshot of what is currently rendered, and
//! performs the few interactions the site needs (popup dismissal and the
//! search form). Two backends are provided:
//!
//! - [`WebDriverNavigator`]: a real browser through a WebDriver server
//! - [`HttpNavigator`]: plain HTTP fetches of server-rendered pages

mod http;
mod webdriver;

pub use http::{build_http_client, HttpNavigator};
pub use webdriver::{chrome_capabilities, Capabilities, WebDriverNavigator};

use crate::NavResult;
use async_trait::async_trait;
use url::Url;

/// Source and address of the page currently shown by a navigator
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// Final URL after redirects
    pub url: Url,
    /// Rendered HTML
    pub html: String,
}

/// Capability surface the pipeline needs from a browser
#[async_trait]
pub trait Navigator: Send {
    /// Navigates to `url` and waits for the load to finish
    async fn load(&mut self, url: &Url) -> NavResult<()>;

    /// Returns the currently rendered page
    async fn snapshot(&mut self) -> NavResult<PageSnapshot>;

    /// Runs a script in the current page
    async fn run_script(&mut self, script: &str) -> NavResult<()>;

    /// Types `keyword` into the search box and clicks the search button
    async fn submit_search(
        &mut self,
        input_selector: &str,
        button_selector: &str,
        keyword: &str,
    ) -> NavResult<()>;

    /// Ends the session
    async fn close(&mut self) -> NavResult<()>;
}
