//! Filter to keep result titles unique.

use crate::traits::Filter;
use anyhow::{anyhow, Result};
use data_loader::Catalog;
use sources::{Candidate, SeedContext};
use std::collections::HashSet;
use std::sync::Arc;

/// Drops candidates whose title equals a seed title or the title of an
/// earlier (higher-ranked) candidate.
///
/// The catalog allows repeated titles under different ids; this is what
/// keeps them from appearing twice in one result.
pub struct DistinctTitleFilter {
    catalog: Arc<Catalog>,
}

impl DistinctTitleFilter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for DistinctTitleFilter {
    fn name(&self) -> &str {
        "DistinctTitleFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &SeedContext) -> Result<Vec<Candidate>> {
        let mut seen: HashSet<&str> = context.seed_titles.iter().map(String::as_str).collect();
        let mut filtered = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let movie = self
                .catalog
                .get_movie(candidate.movie_id)
                .ok_or_else(|| anyhow!("candidate {} is not in the catalog", candidate.movie_id))?;
            if seen.insert(movie.title.as_str()) {
                filtered.push(candidate);
            }
        }
        Ok(filtered)
    }
}
