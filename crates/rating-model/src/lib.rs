//! Rating Model - collaborative scoring for seed-based recommendations
//!
//! ## Pieces
//! - `RatingModel`: the trait recommenders score through
//! - `FactorModel`: biased matrix factorisation, loaded from a JSON artifact
//! - `FactorTrainer`: seeded SGD that produces a `FactorModel`
//! - `evaluate`: train/test split and RMSE
//!
//! A request never has a real user. The seeds become a `PseudoUserProfile`,
//! which the model folds into a `UserSurrogate` before predicting.

mod error;
pub mod evaluate;
mod factor;
mod linalg;
mod model;
mod train;

pub use error::{ModelError, Result};
pub use evaluate::{global_mean_rmse, rmse, train_test_split};
pub use factor::{FactorModel, LatentParams, FORMAT_VERSION};
pub use model::{PseudoUserProfile, RatingModel, UserSurrogate};
pub use train::{FactorTrainer, TrainConfig};
