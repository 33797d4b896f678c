//! Pipeline driver - main scraping orchestration logic
//!
//! Opens the search results (through the search form or a direct listing
//! URL), then alternates between collecting the current page and asking the
//! pagination controller where to go next. Pages are handled strictly one
//! after another; a parsed page never outlives its iteration.

use crate::config::Config;
use crate::extract::{FieldExtractor, Page};
use crate::navigator::Navigator;
use crate::pipeline::collector::ListingCollector;
use crate::pipeline::pagination::{PaginationController, Step, Termination};
use crate::recorder::{RunRecorder, RunStats};
use crate::{ConfigError, NavigationError, ScrapeError};
use std::time::Duration;
use url::Url;

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub termination: Termination,
    pub pages_visited: u32,
    pub stats: RunStats,
}

/// Drives one navigator through the search results
pub struct Pipeline<N> {
    config: Config,
    navigator: N,
    collector: ListingCollector,
    pagination: PaginationController,
    settle_delay: Duration,
}

impl<N: Navigator> Pipeline<N> {
    /// Creates a pipeline; selectors are compiled up front
    pub fn new(config: Config, navigator: N) -> Result<Self, ConfigError> {
        let extractor = FieldExtractor::from_config(&config.selectors)?;
        let pagination =
            PaginationController::new(config.run.page_limit, &config.selectors.next_page)?;
        let settle_delay = Duration::from_millis(config.browser.settle_delay_ms);

        Ok(Self {
            config,
            navigator,
            collector: ListingCollector::new(extractor),
            pagination,
            settle_delay,
        })
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn into_navigator(self) -> N {
        self.navigator
    }

    /// Runs the search for `keyword` to completion
    ///
    /// Records, counters and log lines go to `recorder`, which stays with the
    /// caller, so whatever was collected before a fatal error is still
    /// available.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The loop ended on the last page or the page limit
    /// * `Err(ScrapeError)` - Navigation failed; the run was aborted
    pub async fn run(
        &mut self,
        keyword: &str,
        recorder: &mut RunRecorder,
    ) -> Result<RunReport, ScrapeError> {
        recorder.info(format!("Search keyword: {}", keyword));

        self.open_search(keyword, recorder).await?;

        let mut pagination = self.pagination.clone();
        loop {
            let snapshot = self.navigator.snapshot().await?;

            let step = {
                let page = Page::parse(snapshot);
                let page_number = pagination.current_page();
                let added = self.collector.collect(&page, page_number, recorder).len();
                tracing::info!("Page {} done: {} records", page_number, added);
                debug_assert!(recorder.stats().is_consistent());
                pagination.advance(&page)?
            };

            match step {
                Step::Navigate { page, url } => {
                    recorder.info(format!("Moving to page {}: {}", page, url));
                    self.navigator.load(&url).await?;
                    self.settle().await;
                }
                Step::Done(termination) => {
                    recorder.info(format!("Stopping: {}", termination));
                    return Ok(RunReport {
                        termination,
                        pages_visited: pagination.current_page(),
                        stats: recorder.stats(),
                    });
                }
            }
        }
    }

    /// Brings the navigator to the first results page
    async fn open_search(
        &mut self,
        keyword: &str,
        recorder: &mut RunRecorder,
    ) -> Result<(), ScrapeError> {
        if self.config.run.direct_url {
            let url = self
                .config
                .site
                .direct_listing_url(keyword)
                .map_err(|e| NavigationError::InvalidUrl(e.to_string()))?;
            recorder.info(format!("Opening listing URL: {}", url));
            self.navigator.load(&url).await?;
            self.settle().await;
            return Ok(());
        }

        let home = Url::parse(&self.config.site.home_url)
            .map_err(|e| NavigationError::InvalidUrl(e.to_string()))?;
        recorder.info(format!("Opening search page: {}", home));
        self.navigator.load(&home).await?;
        self.settle().await;

        self.dismiss_popup().await;

        // an empty keyword is submitted as-is
        self.navigator
            .submit_search(
                &self.config.site.search_input_selector,
                &self.config.site.search_button_selector,
                keyword,
            )
            .await?;
        self.settle().await;

        Ok(())
    }

    /// Best-effort popup dismissal; failures are ignored
    async fn dismiss_popup(&mut self) {
        for attempt in 1..=self.config.site.popup_dismiss_attempts {
            let result = self
                .navigator
                .run_script(&self.config.site.popup_close_script)
                .await;
            self.settle().await;

            if let Err(e) = result {
                tracing::debug!("Popup dismissal attempt {} ignored: {}", attempt, e);
                break;
            }
        }
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}
