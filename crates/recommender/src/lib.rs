//! Recommender crate: three favourite movies in, a ranked list of titles out.
//!
//! Two strategies share one call contract (`Recommender`):
//! - **content**: attribute similarity to the seeds, summed over the seeds
//! - **collaborative**: ratings predicted for a pseudo-user who loves the seeds
//!
//! `RecommendationEngine` loads the shared state once and dispatches by
//! `Strategy`. Failures come back as `RecommendError`, which keeps an
//! unknown seed title apart from internal failures so the caller can decide
//! how much to tell the user.
//!
//! ```ignore
//! use recommender::{EngineConfig, RecommendationEngine, Strategy};
//!
//! let engine = RecommendationEngine::load(data_dir, model_path, EngineConfig::default())?;
//! let titles = engine.recommend(
//!     Strategy::Content,
//!     &["Heat (1995)", "Casino (1995)", "Se7en (1995)"],
//!     None,
//! )?;
//! ```

pub mod collaborative;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod strategy;

pub use collaborative::CollaborativeRecommender;
pub use config::{CollaborativeConfig, ContentConfig, EngineConfig, DEFAULT_TOP_N};
pub use content::ContentRecommender;
pub use engine::RecommendationEngine;
pub use error::{RecommendError, Result};
pub use strategy::{Recommendation, Recommender, Strategy};
