//! The scoring contract the collaborative recommender depends on.

use crate::error::Result;
use data_loader::MovieId;

/// Synthetic ratings standing in for a real user.
///
/// Built per request from the seed movies and dropped afterwards. Entries
/// are kept sorted by movie id with duplicates removed, so the same seed
/// set always yields the same profile regardless of input order.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoUserProfile {
    ratings: Vec<(MovieId, f32)>,
}

impl PseudoUserProfile {
    /// Every seed rated `rating`.
    pub fn from_seeds(seeds: &[MovieId], rating: f32) -> Self {
        Self::from_ratings(seeds.iter().map(|&id| (id, rating)).collect())
    }

    /// Explicit ratings; on duplicate ids the first one wins.
    pub fn from_ratings(mut ratings: Vec<(MovieId, f32)>) -> Self {
        ratings.sort_by_key(|(id, _)| *id);
        ratings.dedup_by_key(|(id, _)| *id);
        Self { ratings }
    }

    pub fn ratings(&self) -> &[(MovieId, f32)] {
        &self.ratings
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// A user as the model sees it: a bias and a latent vector.
///
/// Models without latent factors leave `factors` empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSurrogate {
    pub bias: f32,
    pub factors: Vec<f32>,
}

/// A trained rating predictor.
///
/// ## Contract
/// - `predict` is pure and deterministic.
/// - `predict` is total over movie ids: items the model never saw still
///   get a score.
/// - `Send + Sync` so one loaded model can serve concurrent requests.
pub trait RatingModel: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Derive a user surrogate from synthetic ratings.
    fn condition(&self, profile: &PseudoUserProfile) -> Result<UserSurrogate>;

    /// Predicted rating of `movie_id` for `user`
    fn predict(&self, user: &UserSurrogate, movie_id: MovieId) -> f32;
}
