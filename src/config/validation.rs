use crate::config::types::{
    Backend, BrowserConfig, Config, OutputConfig, RunConfig, SelectorConfig, SiteConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_run_config(&config.run)?;
    validate_browser_config(&config.browser, &config.run)?;
    validate_site_config(&config.site)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }
    Ok(())
}

fn validate_browser_config(config: &BrowserConfig, run: &RunConfig) -> Result<(), ConfigError> {
    match config.backend {
        Backend::Webdriver => {
            Url::parse(&config.webdriver_url).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid webdriver_url '{}': {}",
                    config.webdriver_url, e
                ))
            })?;
        }
        Backend::Http => {
            // no form to type into without a browser
            if !run.direct_url {
                return Err(ConfigError::Validation(
                    "the http backend requires direct-url mode".to_string(),
                ));
            }
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    Url::parse(&config.home_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid home_url '{}': {}", config.home_url, e))
    })?;

    if !config.direct_url_template.contains("{keyword}") {
        return Err(ConfigError::Validation(format!(
            "direct_url_template must contain '{{keyword}}', got '{}'",
            config.direct_url_template
        )));
    }

    config.direct_listing_url("keyword").map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid direct_url_template '{}': {}",
            config.direct_url_template, e
        ))
    })?;

    validate_selector("search_input_selector", &config.search_input_selector)?;
    validate_selector("search_button_selector", &config.search_button_selector)?;

    Ok(())
}

fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    validate_selector("listing", &config.listing)?;
    validate_selector("name", &config.name)?;
    validate_selector("tagline", &config.tagline)?;
    validate_selector("employment_status", &config.employment_status)?;
    validate_selector("table", &config.table)?;
    validate_selector("table_key", &config.table_key)?;
    validate_selector("table_value", &config.table_value)?;
    validate_selector("next_page", &config.next_page)?;

    if config.salary_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "salary_label cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    if config.logs_dir.is_empty() {
        return Err(ConfigError::Validation(
            "logs_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses a CSS selector, naming the offending key on failure
pub(crate) fn parse_selector(key: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} = '{}': {:?}", key, selector, e)))
}

fn validate_selector(key: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!("{} cannot be empty", key)));
    }
    parse_selector(key, selector).map(|_| ())
}
