//! Engine configuration, loadable from a JSON file.
//!
//! Every field has a default, so `{}` is a valid config file:
//!
//! ```json
//! {
//!   "top_n": 10,
//!   "similarity": { "weighting": "tf_idf", "min_token_frequency": 2 },
//!   "content": { "aggregation": "sum" },
//!   "collaborative": { "seed_rating": 5.0 }
//! }
//! ```

use anyhow::{Context, Result};
use data_loader::MAX_RATING;
use serde::{Deserialize, Serialize};
use similarity::SimilarityConfig;
use sources::Aggregation;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Results per request when the caller does not say otherwise
    pub top_n: usize,
    pub similarity: SimilarityConfig,
    pub content: ContentConfig,
    pub collaborative: CollaborativeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            similarity: SimilarityConfig::default(),
            content: ContentConfig::default(),
            collaborative: CollaborativeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborativeConfig {
    /// Synthetic rating given to each seed in the pseudo-user profile
    pub seed_rating: f32,
}

impl Default for CollaborativeConfig {
    fn default() -> Self {
        Self {
            seed_rating: MAX_RATING,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open config {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.content.aggregation = aggregation;
        self
    }

    pub fn with_seed_rating(mut self, seed_rating: f32) -> Self {
        self.collaborative.seed_rating = seed_rating;
        self
    }
}
