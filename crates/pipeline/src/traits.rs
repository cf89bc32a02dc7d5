//! Core traits for the filtering pipeline.

use anyhow::Result;
use sources::{Candidate, SeedContext};

/// Core trait for filtering candidates.
///
/// Filters take ownership of the candidates and return the survivors in
/// their original order. `Send + Sync` so a pipeline can be shared across
/// request threads.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of ranked candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The surviving candidates, order preserved
    /// * `Err` - If the candidate set is unusable
    fn apply(&self, candidates: Vec<Candidate>, context: &SeedContext) -> Result<Vec<Candidate>>;
}
