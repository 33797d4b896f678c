//! Listing collector
//!
//! Walks the listings of one page in document order. Each listing is counted
//! exactly once, either as a success (its record is kept) or as a failure
//! (logged, nothing kept). A failing listing never stops the page.

use crate::extract::{FieldExtractor, ListingRecord, Page};
use crate::recorder::RunRecorder;

pub struct ListingCollector {
    extractor: FieldExtractor,
}

impl ListingCollector {
    pub fn new(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Collects every listing on `page` into `recorder`
    ///
    /// Returns the records added for this page, in traversal order.
    pub fn collect<'r>(
        &self,
        page: &Page,
        page_number: u32,
        recorder: &'r mut RunRecorder,
    ) -> &'r [ListingRecord] {
        let start = recorder.records().len();
        let listings = self.extractor.listings(page);
        tracing::debug!("Page {}: {} listings found", page_number, listings.len());

        for listing in &listings {
            // run-wide, zero-based
            let index = recorder.stats().attempted;

            match self.extractor.extract(listing) {
                Ok(record) => {
                    recorder.info(format!(
                        "[success] #{} (page {}): {}",
                        index, page_number, record.company_name
                    ));
                    recorder.record_success(record);
                }
                Err(e) => {
                    let name = self
                        .extractor
                        .best_effort_name(listing)
                        .unwrap_or_else(|| "<unknown>".to_string());
                    recorder.warn(format!(
                        "[failure] #{} (page {}): {}: {}",
                        index, page_number, name, e
                    ));
                    recorder.record_failure();
                }
            }
        }

        let added = &recorder.records()[start..];
        tracing::debug!(
            "Page {}: {} extracted, {} failed",
            page_number,
            added.len(),
            listings.len() - added.len()
        );
        added
    }
}
