//! Filter implementations for the candidate pipeline.

pub mod distinct_title;
pub mod finite_score;

// Re-export for convenience
pub use distinct_title::DistinctTitleFilter;
pub use finite_score::FiniteScoreFilter;
