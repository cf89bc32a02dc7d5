//! Collaborative recommender over a trained rating model.

use crate::error::Result;
use crate::strategy::{finalize, Recommendation, Recommender};
use data_loader::Catalog;
use pipeline::FilterPipeline;
use rating_model::RatingModel;
use sources::{build_seed_context, CollaborativeSource};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranks movies by the rating a seed-built pseudo-user is predicted to give
#[derive(Clone)]
pub struct CollaborativeRecommender {
    catalog: Arc<Catalog>,
    source: CollaborativeSource,
    filters: Arc<FilterPipeline>,
}

impl CollaborativeRecommender {
    pub fn new(catalog: Arc<Catalog>, model: Arc<dyn RatingModel>) -> Self {
        let filters = Arc::new(FilterPipeline::standard(catalog.clone()));
        Self {
            source: CollaborativeSource::new(catalog.clone(), model),
            catalog,
            filters,
        }
    }

    /// Configure the synthetic seed rating (default: 5.0)
    pub fn with_seed_rating(mut self, rating: f32) -> Self {
        self.source = self.source.with_seed_rating(rating);
        self
    }
}

impl Recommender for CollaborativeRecommender {
    fn name(&self) -> &str {
        "collaborative"
    }

    #[instrument(skip(self), fields(seed_rating = self.source.seed_rating()))]
    fn recommend_scored(&self, seed_titles: &[&str; 3], top_n: usize) -> Result<Vec<Recommendation>> {
        let context = build_seed_context(&self.catalog, seed_titles)?;
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.source.get_candidates(&context)?;
        let results = finalize(&self.catalog, &self.filters, candidates, &context, top_n)?;
        debug!("Returning {} collaborative recommendations", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use data_loader::{Movie, MovieId};
    use rating_model::{ModelError, PseudoUserProfile, UserSurrogate};

    /// Predicts NaN for one movie
    struct BrokenModel(MovieId);

    impl RatingModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        fn condition(&self, _profile: &PseudoUserProfile) -> rating_model::Result<UserSurrogate> {
            Ok(UserSurrogate::default())
        }

        fn predict(&self, _user: &UserSurrogate, movie_id: MovieId) -> f32 {
            if movie_id == self.0 { f32::NAN } else { 3.0 }
        }
    }

    /// Cannot build a surrogate
    struct SingularModel;

    impl RatingModel for SingularModel {
        fn name(&self) -> &str {
            "singular"
        }

        fn condition(&self, _profile: &PseudoUserProfile) -> rating_model::Result<UserSurrogate> {
            Err(ModelError::SingularSystem)
        }

        fn predict(&self, _user: &UserSurrogate, _movie_id: MovieId) -> f32 {
            0.0
        }
    }

    fn create_test_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_movies((1..=5).map(|id| Movie::new(id, format!("Movie {id}"))).collect())
                .unwrap(),
        )
    }

    #[test]
    fn test_nan_prediction_is_computation_error() {
        let recommender = CollaborativeRecommender::new(create_test_catalog(), Arc::new(BrokenModel(5)));
        let err = recommender
            .recommend(&["Movie 1", "Movie 2", "Movie 3"], 2)
            .unwrap_err();
        assert!(matches!(err, RecommendError::Computation(_)));
    }

    #[test]
    fn test_model_failure_is_computation_error() {
        let recommender = CollaborativeRecommender::new(create_test_catalog(), Arc::new(SingularModel));
        let err = recommender
            .recommend(&["Movie 1", "Movie 2", "Movie 3"], 2)
            .unwrap_err();
        assert!(matches!(err, RecommendError::Computation(_)));
    }
}
