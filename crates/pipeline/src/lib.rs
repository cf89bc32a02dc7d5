//! Post-scoring filters for ranked movie candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Sources hand over every non-seed candidate already in ranking order;
//! seed ids never reach the filters. Filters only
//! ever drop candidates, never reorder them, so truncating the filtered list
//! to `n` always yields a prefix of the list truncated to `n + 1`.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(FiniteScoreFilter)
//!     .add_filter(DistinctTitleFilter::new(catalog.clone()));
//!
//! let filtered = pipeline.apply(candidates, &context)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
