//! Biased matrix factorisation model: `r̂(u, i) = μ + b_u + b_i + p_u · q_i`.
//!
//! With zero factors this is the baseline-only predictor. Trained offline
//! (see `train`), persisted as JSON, loaded once at startup.

use crate::error::{ModelError, Result};
use crate::linalg;
use crate::model::{PseudoUserProfile, RatingModel, UserSurrogate};
use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Bumped whenever the serialized layout changes
pub const FORMAT_VERSION: u32 = 1;

/// Bias and latent vector for one user or item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatentParams {
    pub bias: f32,
    pub factors: Vec<f32>,
}

/// Trained latent-factor model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorModel {
    pub(crate) format_version: u32,
    pub(crate) global_mean: f32,
    pub(crate) factors: usize,
    /// Ridge penalty used when folding in a pseudo-user
    pub(crate) fold_in_regularization: f32,
    pub(crate) rating_scale: (f32, f32),
    pub(crate) items: HashMap<MovieId, LatentParams>,
    pub(crate) users: HashMap<UserId, LatentParams>,
}

impl FactorModel {
    /// Load a model artifact written by `save`.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact_error = |reason: String| ModelError::Artifact {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| artifact_error(e.to_string()))?;
        let model: FactorModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| artifact_error(e.to_string()))?;

        if model.format_version != FORMAT_VERSION {
            return Err(ModelError::FormatVersion {
                found: model.format_version,
                expected: FORMAT_VERSION,
            });
        }
        if model.items.values().any(|p| p.factors.len() != model.factors) {
            return Err(artifact_error("item factor length mismatch".to_string()));
        }

        info!(
            "Loaded rating model from {:?}: {} items, {} users, {} factors",
            path,
            model.items.len(),
            model.users.len(),
            model.factors
        );
        Ok(model)
    }

    /// Write the model as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let artifact_error = |reason: String| ModelError::Artifact {
            path: path.display().to_string(),
            reason,
        };
        let file = File::create(path).map_err(|e| artifact_error(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|e| artifact_error(e.to_string()))
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn factors(&self) -> usize {
        self.factors
    }

    pub fn rating_scale(&self) -> (f32, f32) {
        self.rating_scale
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Surrogate for a user seen during training. Unknown users get the
    /// zero surrogate, which predicts `μ + b_i`.
    pub fn surrogate_for_user(&self, user_id: UserId) -> UserSurrogate {
        self.users
            .get(&user_id)
            .map(|p| UserSurrogate {
                bias: p.bias,
                factors: p.factors.clone(),
            })
            .unwrap_or_default()
    }

    /// Prediction clipped to the rating scale, for error metrics
    pub fn predict_clamped(&self, user: &UserSurrogate, movie_id: MovieId) -> f32 {
        let (lo, hi) = self.rating_scale;
        self.predict(user, movie_id).clamp(lo, hi)
    }

    /// Solve `(ZᵀZ + λI) x = Zᵀt` for `x = [b_u, p_u]`, where each profile
    /// rating contributes a row `z = [1, q_i]` and target `t = r - μ - b_i`.
    fn fold_in(&self, profile: &PseudoUserProfile) -> Result<UserSurrogate> {
        let dim = self.factors + 1;
        let lambda = self.fold_in_regularization as f64;

        let mut a = vec![vec![0.0f64; dim]; dim];
        let mut b = vec![0.0f64; dim];
        for (i, row) in a.iter_mut().enumerate() {
            row[i] = lambda;
        }

        let zero = LatentParams::default();
        for &(movie_id, rating) in profile.ratings() {
            let item = self.items.get(&movie_id).unwrap_or(&zero);
            let target = (rating - self.global_mean - item.bias) as f64;

            let mut z = Vec::with_capacity(dim);
            z.push(1.0f64);
            z.extend((0..self.factors).map(|f| item.factors.get(f).copied().unwrap_or(0.0) as f64));

            for i in 0..dim {
                b[i] += z[i] * target;
                for j in 0..dim {
                    a[i][j] += z[i] * z[j];
                }
            }
        }

        let x = linalg::solve(a, b).ok_or(ModelError::SingularSystem)?;
        Ok(UserSurrogate {
            bias: x[0] as f32,
            factors: x[1..].iter().map(|&v| v as f32).collect(),
        })
    }
}

impl RatingModel for FactorModel {
    fn name(&self) -> &str {
        if self.factors == 0 {
            "baseline"
        } else {
            "factorization"
        }
    }

    fn condition(&self, profile: &PseudoUserProfile) -> Result<UserSurrogate> {
        if profile.is_empty() {
            return Err(ModelError::EmptyProfile);
        }
        self.fold_in(profile)
    }

    fn predict(&self, user: &UserSurrogate, movie_id: MovieId) -> f32 {
        let mut score = self.global_mean + user.bias;
        if let Some(item) = self.items.get(&movie_id) {
            score += item.bias;
            score += item
                .factors
                .iter()
                .zip(&user.factors)
                .map(|(q, p)| q * p)
                .sum::<f32>();
        }
        score
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Two items with hand-set parameters
    pub(crate) fn hand_built_model(factors: usize) -> FactorModel {
        let mut items = HashMap::new();
        items.insert(
            1,
            LatentParams {
                bias: 0.5,
                factors: vec![1.0; factors],
            },
        );
        items.insert(
            2,
            LatentParams {
                bias: -0.5,
                factors: vec![-1.0; factors],
            },
        );
        let mut users = HashMap::new();
        users.insert(
            7,
            LatentParams {
                bias: 0.25,
                factors: vec![0.5; factors],
            },
        );
        FactorModel {
            format_version: FORMAT_VERSION,
            global_mean: 3.5,
            factors,
            fold_in_regularization: 1.0,
            rating_scale: (0.5, 5.0),
            items,
            users,
        }
    }

    #[test]
    fn test_predict_known_and_unknown_items() {
        let model = hand_built_model(2);
        let user = model.surrogate_for_user(7);

        // 3.5 + 0.25 + 0.5 + (1*0.5 + 1*0.5)
        assert!((model.predict(&user, 1) - 5.25).abs() < 1e-6);
        assert!((model.predict_clamped(&user, 1) - 5.0).abs() < 1e-6);
        // Unknown item: μ + b_u
        assert!((model.predict(&user, 999) - 3.75).abs() < 1e-6);
        // Unknown user: μ + b_i
        assert!((model.predict(&model.surrogate_for_user(42), 2) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fold_in_prefers_items_like_the_seeds() {
        let model = hand_built_model(2);
        let profile = PseudoUserProfile::from_seeds(&[1], 5.0);
        let user = model.condition(&profile).unwrap();

        assert_eq!(user.factors.len(), 2);
        assert!(model.predict(&user, 1) > model.predict(&user, 2));
        assert!(user.factors.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_fold_in_is_deterministic() {
        let model = hand_built_model(3);
        let a = model.condition(&PseudoUserProfile::from_seeds(&[1, 2, 99], 5.0)).unwrap();
        let b = model.condition(&PseudoUserProfile::from_seeds(&[99, 2, 1], 5.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_baseline_fold_in_only_sets_bias() {
        let model = hand_built_model(0);
        let user = model.condition(&PseudoUserProfile::from_seeds(&[1], 5.0)).unwrap();

        assert!(user.factors.is_empty());
        // (1 + λ) b_u = 5 - 3.5 - 0.5  =>  b_u = 0.5
        assert!((user.bias - 0.5).abs() < 1e-6);
        assert_eq!(model.name(), "baseline");
    }

    #[test]
    fn test_empty_profile_rejected() {
        let model = hand_built_model(2);
        let result = model.condition(&PseudoUserProfile::from_seeds(&[], 5.0));
        assert!(matches!(result, Err(ModelError::EmptyProfile)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let model = hand_built_model(2);

        model.save(&path).unwrap();
        let loaded = FactorModel::load(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_load_rejects_other_versions_and_garbage() {
        let dir = TempDir::new().unwrap();

        let path = dir.path().join("old.json");
        let mut model = hand_built_model(1);
        model.format_version = FORMAT_VERSION + 1;
        model.save(&path).unwrap();
        assert!(matches!(
            FactorModel::load(&path),
            Err(ModelError::FormatVersion { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(FactorModel::load(&garbage), Err(ModelError::Artifact { .. })));

        assert!(matches!(
            FactorModel::load(&dir.path().join("missing.json")),
            Err(ModelError::Artifact { .. })
        ));
    }
}
