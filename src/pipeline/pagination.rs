//! Pagination controller
//!
//! Two states, `HasMore` and `Done(reason)`. After each collected
//! page the controller either hands back the next page's URL or stops.
//! Running out of pages and hitting the page limit are both ordinary ends.

use crate::config::parse_selector;
use crate::extract::Page;
use crate::{ConfigError, NavResult, NavigationError};
use scraper::Selector;
use std::fmt;
use url::Url;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The page had no "next" affordance
    LastPage,
    /// The configured number of pages was processed
    PageLimit { limit: u32 },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastPage => write!(f, "reached the last page"),
            Self::PageLimit { limit } => write!(f, "reached the page limit ({})", limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    HasMore,
    Done(Termination),
}

/// Outcome of [`PaginationController::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Navigate { page: u32, url: Url },
    Done(Termination),
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PaginationState,
    /// 1-based number of the page being processed
    page: u32,
    limit: u32,
    next_page: Selector,
    next_page_src: String,
}

impl PaginationController {
    pub fn new(limit: u32, next_page: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            state: PaginationState::HasMore,
            page: 1,
            limit,
            next_page: parse_selector("next_page", next_page)?,
            next_page_src: next_page.to_string(),
        })
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Number of the page being (or last) processed
    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// Decides what follows the page that was just collected
    ///
    /// The "next" affordance is checked first, so a limit reached on the last
    /// page reports `LastPage`. Once done, the same `Done` step is returned
    /// again without looking at the page.
    pub fn advance(&mut self, page: &Page) -> NavResult<Step> {
        if let PaginationState::Done(reason) = self.state {
            return Ok(Step::Done(reason));
        }

        let Some(next) = page.find_one(&self.next_page) else {
            return Ok(self.finish(Termination::LastPage));
        };

        if self.page >= self.limit {
            return Ok(self.finish(Termination::PageLimit { limit: self.limit }));
        }

        let url = next
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| page.url().join(href).ok())
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| NavigationError::MissingTarget {
                selector: self.next_page_src.clone(),
            })?;

        self.page += 1;
        Ok(Step::Navigate {
            page: self.page,
            url,
        })
    }

    fn finish(&mut self, reason: Termination) -> Step {
        self.state = PaginationState::Done(reason);
        Step::Done(reason)
    }
}
