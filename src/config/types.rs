use serde::Deserialize;
use url::Url;

/// Main configuration structure
///
/// Every section falls back to the defaults for tenshoku.mynavi.jp, so an
/// empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-run behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of result pages to visit
    #[serde(rename = "page-limit")]
    pub page_limit: u32,

    /// Build the listing URL from the keyword instead of using the search form
    #[serde(rename = "direct-url")]
    pub direct_url: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            page_limit: 5,
            direct_url: false,
        }
    }
}

/// Which navigation backend drives the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A real browser behind a WebDriver server
    Webdriver,
    /// Plain HTTP fetches of server-rendered pages
    Http,
}

/// Browser / navigation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub backend: Backend,

    /// WebDriver server endpoint (chromedriver, geckodriver, ...)
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    pub headless: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Fixed wait after each navigation and popup dismissal (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Webdriver,
            webdriver_url: "http://localhost:4444".to_string(),
            headless: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.69 Safari/537.36".to_string(),
            settle_delay_ms: 5000,
        }
    }
}

/// Site entry points
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page holding the search form
    #[serde(rename = "home-url")]
    pub home_url: String,

    /// Listing URL with a `{keyword}` placeholder
    #[serde(rename = "direct-url-template")]
    pub direct_url_template: String,

    #[serde(rename = "search-input-selector")]
    pub search_input_selector: String,

    #[serde(rename = "search-button-selector")]
    pub search_button_selector: String,

    /// Script that closes the overlay popup shown on the home page
    #[serde(rename = "popup-close-script")]
    pub popup_close_script: String,

    /// How many times the popup close script is run
    #[serde(rename = "popup-dismiss-attempts")]
    pub popup_dismiss_attempts: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_url: "https://tenshoku.mynavi.jp/".to_string(),
            direct_url_template:
                "https://tenshoku.mynavi.jp/list/kw{keyword}/?jobsearchType=14&searchType=18"
                    .to_string(),
            search_input_selector: ".topSearch__text".to_string(),
            search_button_selector: ".topSearch__button".to_string(),
            popup_close_script: r#"document.querySelector(".karte-close").click()"#.to_string(),
            popup_dismiss_attempts: 2,
        }
    }
}

impl SiteConfig {
    /// Builds the listing URL for `keyword` from the direct URL template
    ///
    /// The keyword is percent-encoded so that spaces, slashes and non-ASCII
    /// text stay inside a single path segment.
    pub fn direct_listing_url(&self, keyword: &str) -> Result<Url, url::ParseError> {
        let encoded: String = url::form_urlencoded::byte_serialize(keyword.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        Url::parse(&self.direct_url_template.replace("{keyword}", &encoded))
    }
}

/// CSS selectors used to read the result pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One listing root
    pub listing: String,

    /// Company name, relative to the listing root
    pub name: String,

    /// Catch copy, relative to the listing root
    pub tagline: String,

    #[serde(rename = "employment-status")]
    pub employment_status: String,

    /// Embedded condition table, relative to the listing root
    pub table: String,

    /// Key cells inside the table
    #[serde(rename = "table-key")]
    pub table_key: String,

    /// Value cells inside the table
    #[serde(rename = "table-value")]
    pub table_value: String,

    /// Key label of the salary row
    #[serde(rename = "salary-label")]
    pub salary_label: String,

    /// "Next page" affordance; must carry an href
    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: ".cassetteRecruit".to_string(),
            name: ".cassetteRecruit__name".to_string(),
            tagline: ".cassetteRecruit__copy".to_string(),
            employment_status: ".labelEmploymentStatus".to_string(),
            table: "table".to_string(),
            table_key: "th".to_string(),
            table_value: "td".to_string(),
            salary_label: "初年度年収".to_string(),
            next_page: ".iconFont--arrowLeft".to_string(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the CSV result files
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// Directory receiving the per-run log files
    #[serde(rename = "logs-dir")]
    pub logs_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "results".to_string(),
            logs_dir: "logs".to_string(),
        }
    }
}
