//! # Recommendation Engine
//!
//! Owns the read-only state both strategies share and hands out the
//! recommender for a request.
//!
//! ## Initialization order
//! 1. Catalog (everything else is keyed by its ids)
//! 2. Similarity index, built from the catalog
//! 3. Rating model, loaded from its artifact
//!
//! Nothing is mutated after construction, so the engine is cheap to clone
//! and safe to share between request threads.

use crate::collaborative::CollaborativeRecommender;
use crate::config::EngineConfig;
use crate::content::ContentRecommender;
use crate::error::{RecommendError, Result};
use crate::strategy::{Recommendation, Recommender, Strategy};
use data_loader::Catalog;
use rating_model::{FactorModel, RatingModel};
use similarity::SimilarityIndex;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    index: Arc<SimilarityIndex>,
    content: Arc<ContentRecommender>,
    collaborative: Arc<CollaborativeRecommender>,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Wire the recommenders around already-built components.
    pub fn new(
        catalog: Arc<Catalog>,
        index: Arc<SimilarityIndex>,
        model: Arc<dyn RatingModel>,
        config: EngineConfig,
    ) -> Self {
        let content = ContentRecommender::new(catalog.clone(), index.clone())
            .with_aggregation(config.content.aggregation);
        let collaborative = CollaborativeRecommender::new(catalog.clone(), model)
            .with_seed_rating(config.collaborative.seed_rating);

        Self {
            catalog,
            index,
            content: Arc::new(content),
            collaborative: Arc::new(collaborative),
            config,
        }
    }

    /// Load every component from disk in initialization order.
    ///
    /// Any failure is `ModelUnavailable`: the engine cannot serve requests.
    #[instrument(skip(config))]
    pub fn load(data_dir: &Path, model_path: &Path, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();

        let catalog = Catalog::load_from_dir(data_dir)
            .map_err(|e| RecommendError::ModelUnavailable(format!("catalog: {e}")))?;
        let catalog = Arc::new(catalog);

        let index = SimilarityIndex::build(&catalog, &config.similarity)
            .map_err(|e| RecommendError::ModelUnavailable(format!("similarity index: {e}")))?;

        if !model_path.exists() {
            return Err(RecommendError::ModelUnavailable(format!(
                "no rating model at {:?} (train one first)",
                model_path
            )));
        }
        let model = FactorModel::load(model_path)
            .map_err(|e| RecommendError::ModelUnavailable(format!("rating model: {e}")))?;

        info!("Engine ready in {:.2?}", start.elapsed());
        Ok(Self::new(catalog, Arc::new(index), Arc::new(model), config))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn similarity_index(&self) -> &Arc<SimilarityIndex> {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The recommender behind a strategy
    pub fn recommender(&self, strategy: Strategy) -> &dyn Recommender {
        match strategy {
            Strategy::Content => self.content.as_ref(),
            Strategy::Collaborative => self.collaborative.as_ref(),
        }
    }

    /// Ranked titles for three seeds; `top_n` defaults to the configured value
    pub fn recommend(
        &self,
        strategy: Strategy,
        seed_titles: &[&str; 3],
        top_n: Option<usize>,
    ) -> Result<Vec<String>> {
        let top_n = top_n.unwrap_or(self.config.top_n);
        self.recommender(strategy).recommend(seed_titles, top_n)
    }

    /// Like `recommend`, with ids and scores
    pub fn recommend_scored(
        &self,
        strategy: Strategy,
        seed_titles: &[&str; 3],
        top_n: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let top_n = top_n.unwrap_or(self.config.top_n);
        let start = Instant::now();
        let results = self.recommender(strategy).recommend_scored(seed_titles, top_n)?;
        info!(
            "{} strategy returned {} recommendations in {:.2?}",
            strategy,
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }
}
