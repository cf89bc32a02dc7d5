//! The similarity index: one normalized attribute vector per catalog item.
//!
//! Built once from the catalog and never mutated; cosine similarity between
//! two items is computed on demand in O(nnz).

use crate::error::{Result, SimilarityError};
use crate::vectorizer::{movie_tokens, SimilarityConfig, SparseVector, Vocabulary};
use data_loader::{Catalog, MovieId};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

/// Read-only item-to-vector map with a pairwise cosine similarity.
///
/// Vectors are stored in catalog order; `position` maps ids back to slots.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    ids: Vec<MovieId>,
    vectors: Vec<SparseVector>,
    position: HashMap<MovieId, usize>,
    vocabulary: Vocabulary,
}

impl SimilarityIndex {
    /// Build vectors for every catalog item.
    pub fn build(catalog: &Catalog, config: &SimilarityConfig) -> Result<Self> {
        if catalog.is_empty() {
            return Err(SimilarityError::EmptyCatalog);
        }

        let movies = catalog.all();
        let token_lists = movie_tokens(movies);
        let vocabulary = Vocabulary::build(&token_lists, config);

        let vectors: Vec<SparseVector> = token_lists
            .par_iter()
            .map(|tokens| vocabulary.vectorize(tokens))
            .collect();

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
        let position = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();

        let empty = vectors.iter().filter(|v| v.is_empty()).count();
        if empty > 0 {
            debug!("{} items have no attribute tokens", empty);
        }
        info!(
            "Built similarity index: {} items, vocabulary of {} tokens ({:?} weighting)",
            ids.len(),
            vocabulary.len(),
            config.weighting
        );

        Ok(Self {
            ids,
            vectors,
            position,
            vocabulary,
        })
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Indexed ids in catalog order
    pub fn ids(&self) -> &[MovieId] {
        &self.ids
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.position.contains_key(&id)
    }

    fn vector(&self, id: MovieId) -> Result<&SparseVector> {
        self.position
            .get(&id)
            .map(|&pos| &self.vectors[pos])
            .ok_or(SimilarityError::UnknownItem(id))
    }

    /// Cosine similarity between two items, in `[0, 1]`.
    ///
    /// Symmetric. Items without tokens have similarity 0 to everything,
    /// including themselves.
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Result<f32> {
        let va = self.vector(a)?;
        let vb = self.vector(b)?;
        Ok(va.dot(vb).clamp(0.0, 1.0))
    }

    /// Similarity of `seed` to every indexed item, in catalog order.
    pub fn similarities_to(&self, seed: MovieId) -> Result<Vec<f32>> {
        let seed_vector = self.vector(seed)?;
        Ok(self
            .vectors
            .par_iter()
            .map(|v| seed_vector.dot(v).clamp(0.0, 1.0))
            .collect())
    }

    /// The `k` items most similar to `id`, excluding `id` itself.
    ///
    /// Ordered by similarity descending, then id ascending.
    pub fn neighbors(&self, id: MovieId, k: usize) -> Result<Vec<(MovieId, f32)>> {
        let scores = self.similarities_to(id)?;
        let mut neighbors: Vec<(MovieId, f32)> = self
            .ids
            .iter()
            .copied()
            .zip(scores)
            .filter(|(other, _)| *other != id)
            .collect();

        neighbors.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}
