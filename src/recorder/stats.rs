//! Run-level counters

/// Listing counters for one run
///
/// Only [`RunRecorder`](super::RunRecorder) mutates these, one update per
/// listing, so `attempted == succeeded + failed` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Listings visited
    pub attempted: u64,

    /// Listings turned into records
    pub succeeded: u64,

    /// Listings that failed extraction
    pub failed: u64,
}

impl RunStats {
    pub fn is_consistent(&self) -> bool {
        self.attempted == self.succeeded + self.failed
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Run Statistics ===\n");
    println!("  Listings attempted: {}", stats.attempted);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed);
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} listings extracted)",
        stats.success_rate(),
        stats.succeeded,
        stats.attempted
    );
}
