//! Field extraction for search-result pages
//!
//! A [`Page`] is a parsed snapshot of the page currently shown by the
//! navigator. [`Listing`] handles borrow from it, so they cannot outlive the
//! iteration that produced them. The [`FieldExtractor`] turns one listing into
//! a [`ListingRecord`] or an [`ExtractionError`].

mod table;

pub use table::KeyValueTable;

use crate::config::{parse_selector, SelectorConfig};
use crate::navigator::PageSnapshot;
use crate::{ConfigError, ExtractionError};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::fmt;
use url::Url;

/// One successfully extracted listing
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub company_name: String,
    pub tagline: String,
    pub employment_status: String,
    pub first_year_salary: Option<String>,
}

impl ListingRecord {
    /// Column names, in serialization order
    pub const HEADERS: [&'static str; 4] = [
        "company_name",
        "tagline",
        "employment_status",
        "first_year_salary",
    ];
}

/// Required fields of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CompanyName,
    Tagline,
    EmploymentStatus,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CompanyName => "company_name",
            Self::Tagline => "tagline",
            Self::EmploymentStatus => "employment_status",
        };
        f.write_str(name)
    }
}

/// A parsed search-result page
///
/// Built from a [`PageSnapshot`] at the start of an iteration and dropped
/// before the next navigation.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    pub fn parse(snapshot: PageSnapshot) -> Self {
        Self {
            document: Html::parse_document(&snapshot.html),
            url: snapshot.url,
        }
    }

    /// Address the page was loaded from; base for relative links
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First element matching `selector` in document order
    pub fn find_one(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }
}

/// One listing's sub-tree inside a [`Page`]
#[derive(Clone, Copy)]
pub struct Listing<'a> {
    root: ElementRef<'a>,
}

impl<'a> Listing<'a> {
    fn find(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.root.select(selector).next()
    }
}

/// Whitespace-normalized text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts [`ListingRecord`]s from listing sub-trees
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    listing: Selector,
    name: Selector,
    tagline: Selector,
    employment_status: Selector,
    table: Selector,
    table_key: Selector,
    table_value: Selector,
    salary_label: String,
}

impl FieldExtractor {
    /// Compiles the configured selectors
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            listing: parse_selector("listing", &config.listing)?,
            name: parse_selector("name", &config.name)?,
            tagline: parse_selector("tagline", &config.tagline)?,
            employment_status: parse_selector("employment_status", &config.employment_status)?,
            table: parse_selector("table", &config.table)?,
            table_key: parse_selector("table_key", &config.table_key)?,
            table_value: parse_selector("table_value", &config.table_value)?,
            salary_label: config.salary_label.clone(),
        })
    }

    /// Listings on `page`, in document order
    pub fn listings<'a>(&self, page: &'a Page) -> Vec<Listing<'a>> {
        page.document
            .select(&self.listing)
            .map(|root| Listing { root })
            .collect()
    }

    /// Extracts one record
    ///
    /// Name, tagline, employment status and the condition table are required.
    /// A table without the salary row yields a record with no salary.
    pub fn extract(&self, listing: &Listing<'_>) -> Result<ListingRecord, ExtractionError> {
        let company_name = self.required(listing, &self.name, Field::CompanyName)?;
        let tagline = self.required(listing, &self.tagline, Field::Tagline)?;
        let employment_status =
            self.required(listing, &self.employment_status, Field::EmploymentStatus)?;

        let table = listing
            .find(&self.table)
            .ok_or(ExtractionError::MissingTable)?;
        let first_year_salary = KeyValueTable::from_element(table, &self.table_key, &self.table_value)
            .lookup(&self.salary_label)
            .map(str::to_string);

        Ok(ListingRecord {
            company_name,
            tagline,
            employment_status,
            first_year_salary,
        })
    }

    /// Company name for failure logs, if the listing still has one
    pub fn best_effort_name(&self, listing: &Listing<'_>) -> Option<String> {
        listing
            .find(&self.name)
            .map(element_text)
            .filter(|name| !name.is_empty())
    }

    fn required(
        &self,
        listing: &Listing<'_>,
        selector: &Selector,
        field: Field,
    ) -> Result<String, ExtractionError> {
        listing
            .find(selector)
            .map(element_text)
            .ok_or(ExtractionError::MissingField(field))
    }
}
