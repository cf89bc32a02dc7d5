//! Content Source - candidates by attribute similarity to the seeds
//!
//! ## Algorithm
//! 1. Look up each distinct seed's similarity to every indexed item
//! 2. Skip the seeds themselves
//! 3. Aggregate the per-seed similarities into one score per item
//! 4. Sort by score descending, then id ascending
//!
//! With `Aggregation::Sum` an item close to two seeds outranks an item
//! equally close to only one of them.

use crate::error::{Result, SourceError};
use crate::types::{sort_candidates, Candidate, CandidateSource, SeedContext};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use similarity::SimilarityIndex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How per-seed similarities combine into one score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of the similarities to each distinct seed
    #[default]
    Sum,
    /// Similarity to the closest seed
    Max,
}

impl Aggregation {
    fn combine(self, scores: impl Iterator<Item = f32>) -> f32 {
        match self {
            Aggregation::Sum => scores.sum(),
            Aggregation::Max => scores.fold(0.0, f32::max),
        }
    }
}

/// Content source scores every catalog item against the seeds
#[derive(Clone)]
pub struct ContentSource {
    /// Shared, read-only similarity space
    index: Arc<SimilarityIndex>,

    aggregation: Aggregation,
}

impl ContentSource {
    pub fn new(index: Arc<SimilarityIndex>) -> Self {
        Self {
            index,
            aggregation: Aggregation::default(),
        }
    }

    /// Configure score aggregation (default: Sum)
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Every non-seed item, ranked
    #[instrument(skip(self, context), fields(seeds = context.seed_ids.len()))]
    pub fn get_candidates(&self, context: &SeedContext) -> Result<Vec<Candidate>> {
        let seed_scores: Vec<Vec<f32>> = context
            .seed_ids
            .iter()
            .map(|&seed| {
                if !self.index.contains(seed) {
                    return Err(SourceError::NotIndexed(seed));
                }
                Ok(self.index.similarities_to(seed)?)
            })
            .collect::<Result<_>>()?;

        let mut candidates: Vec<Candidate> = self
            .index
            .ids()
            .par_iter()
            .enumerate()
            .filter(|(_, id)| !context.is_seed(**id))
            .map(|(pos, &movie_id)| {
                let per_seed = || seed_scores.iter().map(|scores| scores[pos]);
                let score = self.aggregation.combine(per_seed());

                let mut candidate = Candidate::new(movie_id, CandidateSource::Content, score);
                candidate.metadata.matched_seeds = per_seed().filter(|&s| s > 0.0).count();
                candidate
            })
            .collect();

        sort_candidates(&mut candidates);
        debug!("Generated {} content candidates", candidates.len());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed_context::build_seed_context;
    use data_loader::{Catalog, Genre, Movie};
    use similarity::SimilarityConfig;

    /// A, B, C share every attribute; D overlaps with them on one genre; E shares nothing
    fn create_test_catalog() -> Catalog {
        let shared = vec![Genre::Action, Genre::SciFi];
        Catalog::from_movies(vec![
            Movie::new(1, "A").with_genres(shared.clone()).with_tags(&["space"]),
            Movie::new(2, "B").with_genres(shared.clone()).with_tags(&["space"]),
            Movie::new(3, "C").with_genres(shared).with_tags(&["space"]),
            Movie::new(4, "D").with_genres(vec![Genre::Romance]),
            Movie::new(5, "E").with_genres(vec![Genre::Action, Genre::Drama]),
            Movie::new(6, "F").with_genres(vec![Genre::Documentary]),
        ])
        .unwrap()
    }

    fn create_source(catalog: &Catalog) -> ContentSource {
        let index = SimilarityIndex::build(catalog, &SimilarityConfig::default()).unwrap();
        ContentSource::new(Arc::new(index))
    }

    #[test]
    fn test_candidates_exclude_seeds_and_rank_overlap_first() {
        let catalog = create_test_catalog();
        let source = create_source(&catalog);
        let context = build_seed_context(&catalog, &["A", "B", "C"]).unwrap();

        let candidates = source.get_candidates(&context).unwrap();
        let ids: Vec<_> = candidates.iter().map(|c| c.movie_id).collect();

        // E overlaps on Action; D and F tie at zero and fall back to id order
        assert_eq!(ids, vec![5, 4, 6]);
        assert_eq!(candidates[0].metadata.matched_seeds, 3);
        assert_eq!(candidates[1].metadata.matched_seeds, 0);
    }

    #[test]
    fn test_sum_rewards_multiple_seeds() {
        let catalog = Catalog::from_movies(vec![
            Movie::new(1, "Seed One").with_genres(vec![Genre::Horror]),
            Movie::new(2, "Seed Two").with_genres(vec![Genre::Comedy]),
            Movie::new(3, "Seed Three").with_genres(vec![Genre::Western]),
            // Close to one seed only
            Movie::new(4, "Pure Horror").with_genres(vec![Genre::Horror]),
            // Partially close to two seeds
            Movie::new(5, "Horror Comedy").with_genres(vec![Genre::Horror, Genre::Comedy]),
        ])
        .unwrap();
        let context = build_seed_context(&catalog, &["Seed One", "Seed Two", "Seed Three"]).unwrap();

        let sum = create_source(&catalog).get_candidates(&context).unwrap();
        assert_eq!(sum[0].movie_id, 5);

        let max = create_source(&catalog)
            .with_aggregation(Aggregation::Max)
            .get_candidates(&context)
            .unwrap();
        assert_eq!(max[0].movie_id, 4);
    }

    #[test]
    fn test_candidates_are_deterministic() {
        let catalog = create_test_catalog();
        let source = create_source(&catalog);
        let context = build_seed_context(&catalog, &["A", "D", "F"]).unwrap();

        let first = source.get_candidates(&context).unwrap();
        let second = source.get_candidates(&context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aggregation_deserializes() {
        let agg: Aggregation = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(agg, Aggregation::Max);
    }
}
