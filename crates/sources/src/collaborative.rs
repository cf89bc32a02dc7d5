//! Collaborative Source - candidates by predicted rating
//!
//! ## Algorithm
//! 1. Treat the seeds as movies a synthetic user rated `seed_rating`
//! 2. Let the model fold that profile into a user surrogate
//! 3. Predict a rating for every non-seed catalog item
//! 4. Sort by predicted rating descending, then id ascending

use crate::error::Result;
use crate::types::{sort_candidates, Candidate, CandidateSource, SeedContext};
use data_loader::{Catalog, MAX_RATING};
use rating_model::{PseudoUserProfile, RatingModel};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Collaborative source scores the catalog through a `RatingModel`
#[derive(Clone)]
pub struct CollaborativeSource {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    model: Arc<dyn RatingModel>,

    /// Synthetic rating given to each seed
    seed_rating: f32,
}

impl CollaborativeSource {
    pub fn new(catalog: Arc<Catalog>, model: Arc<dyn RatingModel>) -> Self {
        Self {
            catalog,
            model,
            seed_rating: MAX_RATING,
        }
    }

    /// Configure the synthetic seed rating (default: 5.0)
    pub fn with_seed_rating(mut self, rating: f32) -> Self {
        self.seed_rating = rating;
        self
    }

    pub fn seed_rating(&self) -> f32 {
        self.seed_rating
    }

    /// Every non-seed catalog item, ranked by predicted rating
    #[instrument(skip(self, context), fields(model = self.model.name(), seeds = context.seed_ids.len()))]
    pub fn get_candidates(&self, context: &SeedContext) -> Result<Vec<Candidate>> {
        let profile = PseudoUserProfile::from_seeds(&context.seed_ids, self.seed_rating);
        let user = self.model.condition(&profile)?;
        debug!("Pseudo-user bias {:.3}, {} factors", user.bias, user.factors.len());

        let mut candidates: Vec<Candidate> = self
            .catalog
            .all()
            .par_iter()
            .filter(|movie| !context.is_seed(movie.id))
            .map(|movie| {
                let score = self.model.predict(&user, movie.id);
                Candidate::new(movie.id, CandidateSource::Collaborative, score)
            })
            .collect();

        sort_candidates(&mut candidates);
        debug!("Generated {} collaborative candidates", candidates.len());
        Ok(candidates)
    }
}
