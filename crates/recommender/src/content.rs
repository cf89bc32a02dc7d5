//! Content-based recommender over the similarity index.

use crate::error::Result;
use crate::strategy::{finalize, Recommendation, Recommender};
use data_loader::Catalog;
use pipeline::FilterPipeline;
use similarity::SimilarityIndex;
use sources::{build_seed_context, Aggregation, ContentSource};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranks movies by aggregated attribute similarity to the seeds
#[derive(Clone)]
pub struct ContentRecommender {
    catalog: Arc<Catalog>,
    source: ContentSource,
    filters: Arc<FilterPipeline>,
}

impl ContentRecommender {
    pub fn new(catalog: Arc<Catalog>, index: Arc<SimilarityIndex>) -> Self {
        let filters = Arc::new(FilterPipeline::standard(catalog.clone()));
        Self {
            catalog,
            source: ContentSource::new(index),
            filters,
        }
    }

    /// Configure score aggregation (default: Sum)
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.source = self.source.with_aggregation(aggregation);
        self
    }
}

impl Recommender for ContentRecommender {
    fn name(&self) -> &str {
        "content"
    }

    #[instrument(skip(self), fields(aggregation = ?self.source.aggregation()))]
    fn recommend_scored(&self, seed_titles: &[&str; 3], top_n: usize) -> Result<Vec<Recommendation>> {
        let context = build_seed_context(&self.catalog, seed_titles)?;
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.source.get_candidates(&context)?;
        let results = finalize(&self.catalog, &self.filters, candidates, &context, top_n)?;
        debug!("Returning {} content recommendations", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use data_loader::{Genre, Movie};
    use similarity::SimilarityConfig;

    fn create_recommender(movies: Vec<Movie>) -> ContentRecommender {
        let catalog = Arc::new(Catalog::from_movies(movies).unwrap());
        let index = SimilarityIndex::build(&catalog, &SimilarityConfig::default()).unwrap();
        ContentRecommender::new(catalog, Arc::new(index))
    }

    #[test]
    fn test_scores_are_descending() {
        let recommender = create_recommender(vec![
            Movie::new(1, "A").with_genres(vec![Genre::Action, Genre::Thriller]),
            Movie::new(2, "B").with_genres(vec![Genre::Action]),
            Movie::new(3, "C").with_genres(vec![Genre::Thriller]),
            Movie::new(4, "D").with_genres(vec![Genre::Action, Genre::Thriller]),
            Movie::new(5, "E").with_genres(vec![Genre::Action, Genre::Comedy]),
            Movie::new(6, "F").with_genres(vec![Genre::Musical]),
        ]);

        let results = recommender.recommend_scored(&["A", "B", "C"], 10).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_unknown_seed_even_for_zero_top_n() {
        let recommender = create_recommender(vec![
            Movie::new(1, "A"),
            Movie::new(2, "B"),
            Movie::new(3, "C"),
        ]);
        let err = recommender.recommend(&["A", "B", "Missing"], 0).unwrap_err();
        assert!(matches!(err, RecommendError::UnknownMovie { ref title } if title == "Missing"));
    }
}
