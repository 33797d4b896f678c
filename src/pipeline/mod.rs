//! Extraction pipeline
//!
//! This module contains the run loop and its parts:
//! - Listing collection with per-listing failure isolation
//! - Pagination and termination detection
//! - The driver that opens the search and walks the result pages

mod collector;
mod coordinator;
mod pagination;

pub use collector::ListingCollector;
pub use coordinator::{Pipeline, RunReport};
pub use pagination::{PaginationController, PaginationState, Step, Termination};
