//! Plain HTTP navigator
//!
//! Fetches server-rendered result pages with `reqwest`. There is no script
//! engine and no form handling, so only direct-URL runs can use it.

use super::{Navigator, PageSnapshot};
use crate::config::BrowserConfig;
use crate::{NavResult, NavigationError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the configured user agent
///
/// # Example
///
/// ```no_run
/// use job_listing_scraper::config::BrowserConfig;
/// use job_listing_scraper::navigator::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Navigator backed by plain GET requests
pub struct HttpNavigator {
    client: Client,
    current: Option<PageSnapshot>,
}

impl HttpNavigator {
    pub fn new(config: &BrowserConfig) -> NavResult<Self> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn load(&mut self, url: &Url) -> NavResult<()> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                NavigationError::Load {
                    url: url.to_string(),
                    message: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                NavigationError::Load {
                    url: url.to_string(),
                    message: "Connection refused".to_string(),
                }
            } else {
                NavigationError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await?;

        self.current = Some(PageSnapshot {
            url: final_url,
            html,
        });
        Ok(())
    }

    async fn snapshot(&mut self) -> NavResult<PageSnapshot> {
        self.current.clone().ok_or_else(|| NavigationError::Load {
            url: String::new(),
            message: "no page has been loaded yet".to_string(),
        })
    }

    async fn run_script(&mut self, _script: &str) -> NavResult<()> {
        Err(NavigationError::Unsupported("script execution"))
    }

    async fn submit_search(
        &mut self,
        _input_selector: &str,
        _button_selector: &str,
        _keyword: &str,
    ) -> NavResult<()> {
        Err(NavigationError::Unsupported("search form submission"))
    }

    async fn close(&mut self) -> NavResult<()> {
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&BrowserConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_before_load_fails() {
        let mut nav = HttpNavigator::new(&BrowserConfig::default()).unwrap();
        assert!(nav.snapshot().await.is_err());
    }

    #[tokio::test]
    async fn test_load_and_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>求人</body></html>")
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let mut nav = HttpNavigator::new(&BrowserConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/list/", server.uri())).unwrap();
        nav.load(&url).await.unwrap();

        let snapshot = nav.snapshot().await.unwrap();
        assert_eq!(snapshot.url, url);
        assert!(snapshot.html.contains("求人"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut nav = HttpNavigator::new(&BrowserConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = nav.load(&url).await.unwrap_err();
        assert!(matches!(err, NavigationError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_interactions_unsupported() {
        let mut nav = HttpNavigator::new(&BrowserConfig::default()).unwrap();
        assert!(matches!(
            nav.run_script("1").await,
            Err(NavigationError::Unsupported(_))
        ));
        assert!(matches!(
            nav.submit_search(".a", ".b", "kw").await,
            Err(NavigationError::Unsupported(_))
        ));
    }
}
