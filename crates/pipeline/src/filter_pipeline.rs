//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{DistinctTitleFilter, FiniteScoreFilter};
use crate::traits::Filter;
use anyhow::{Context, Result};
use data_loader::Catalog;
use sources::{Candidate, SeedContext};
use std::sync::Arc;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(FiniteScoreFilter)
///     .add_filter(DistinctTitleFilter::new(catalog));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The filters every recommendation runs through, in order:
    /// finite scores, then distinct titles.
    pub fn standard(catalog: Arc<Catalog>) -> Self {
        Self::new()
            .add_filter(FiniteScoreFilter)
            .add_filter(DistinctTitleFilter::new(catalog))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// Stops at the first filter that fails; the error names that filter.
    pub fn apply(&self, candidates: Vec<Candidate>, context: &SeedContext) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter
                .apply(current, context)
                .with_context(|| format!("filter {} failed", filter.name()))?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
