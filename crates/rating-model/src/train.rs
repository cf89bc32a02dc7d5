//! Offline SGD training for `FactorModel`.
//!
//! ## Algorithm
//! For each epoch, visit every rating in a shuffled order and step along the
//! gradient of the regularised squared error:
//! - `b_u += lr * (e - reg * b_u)`
//! - `b_i += lr * (e - reg * b_i)`
//! - `p_u += lr * (e * q_i - reg * p_u)`, `q_i += lr * (e * p_u - reg * q_i)`
//!
//! The RNG is seeded, parameters are allocated in rating order, and updates
//! run on one thread, so the same ratings and config give the same model.

use crate::error::{ModelError, Result};
use crate::factor::{FactorModel, LatentParams, FORMAT_VERSION};
use data_loader::{MovieId, Rating, RatingMatrix, UserId, MAX_RATING, MIN_RATING};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Hyperparameters for training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Latent dimensions; 0 trains the baseline-only model
    pub factors: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub regularization: f32,
    /// Factors start uniform in `[-init_std, init_std]`
    pub init_std: f32,
    /// Ridge penalty stored in the model for pseudo-user fold-in
    pub fold_in_regularization: f32,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            factors: 20,
            epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            init_std: 0.1,
            fold_in_regularization: 1.0,
            seed: 42,
        }
    }
}

impl TrainConfig {
    pub fn with_factors(mut self, factors: usize) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_regularization(mut self, regularization: f32) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Dense parameter table keyed by external id
struct ParamTable<K> {
    index: HashMap<K, usize>,
    ids: Vec<K>,
    params: Vec<LatentParams>,
}

impl<K: Copy + Eq + std::hash::Hash> ParamTable<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            ids: Vec::new(),
            params: Vec::new(),
        }
    }

    fn slot(&mut self, id: K, factors: usize, init_std: f32, rng: &mut StdRng) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.params.len();
        self.index.insert(id, slot);
        self.ids.push(id);
        self.params.push(LatentParams {
            bias: 0.0,
            factors: (0..factors)
                .map(|_| rng.random_range(-init_std..=init_std))
                .collect(),
        });
        slot
    }

    fn into_map(self) -> HashMap<K, LatentParams> {
        self.ids.into_iter().zip(self.params).collect()
    }
}

/// Fits a `FactorModel` to historical ratings
pub struct FactorTrainer {
    config: TrainConfig,
}

impl FactorTrainer {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train on every rating in the matrix
    pub fn fit(&self, matrix: &RatingMatrix) -> Result<FactorModel> {
        self.fit_ratings(matrix.ratings())
    }

    /// Train on an explicit rating slice (e.g. the train half of a split)
    #[instrument(skip(self, ratings), fields(ratings = ratings.len(), factors = self.config.factors))]
    pub fn fit_ratings(&self, ratings: &[Rating]) -> Result<FactorModel> {
        if ratings.is_empty() {
            return Err(ModelError::Training("no ratings to train on".to_string()));
        }
        let config = &self.config;
        if !(config.init_std >= 0.0 && config.learning_rate > 0.0) {
            return Err(ModelError::Training(format!(
                "invalid hyperparameters: learning_rate={}, init_std={}",
                config.learning_rate, config.init_std
            )));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let k = config.factors;

        let total: f64 = ratings.iter().map(|r| r.rating as f64).sum();
        let global_mean = (total / ratings.len() as f64) as f32;

        // Allocate parameters in rating order so initialisation is reproducible
        let mut users: ParamTable<UserId> = ParamTable::new();
        let mut items: ParamTable<MovieId> = ParamTable::new();
        let observations: Vec<(usize, usize, f32)> = ratings
            .iter()
            .map(|r| {
                let u = users.slot(r.user_id, k, config.init_std, &mut rng);
                let i = items.slot(r.movie_id, k, config.init_std, &mut rng);
                (u, i, r.rating)
            })
            .collect();

        let lr = config.learning_rate;
        let reg = config.regularization;
        let mut order: Vec<usize> = (0..observations.len()).collect();

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let mut squared_error = 0.0f64;

            for &idx in &order {
                let (u, i, rating) = observations[idx];
                let user = &mut users.params[u];
                let item = &mut items.params[i];

                let dot: f32 = user.factors.iter().zip(&item.factors).map(|(p, q)| p * q).sum();
                let err = rating - (global_mean + user.bias + item.bias + dot);
                squared_error += (err as f64) * (err as f64);

                user.bias += lr * (err - reg * user.bias);
                item.bias += lr * (err - reg * item.bias);
                for f in 0..k {
                    let puf = user.factors[f];
                    let qif = item.factors[f];
                    user.factors[f] += lr * (err * qif - reg * puf);
                    item.factors[f] += lr * (err * puf - reg * qif);
                }
            }

            let rmse = (squared_error / observations.len() as f64).sqrt();
            if !rmse.is_finite() {
                return Err(ModelError::Training(format!(
                    "training diverged at epoch {} (learning rate {} too high?)",
                    epoch + 1,
                    lr
                )));
            }
            debug!("Epoch {}/{}: train RMSE {:.4}", epoch + 1, config.epochs, rmse);
        }

        info!(
            "Trained {}-factor model on {} ratings ({} users, {} items)",
            k,
            observations.len(),
            users.ids.len(),
            items.ids.len()
        );

        Ok(FactorModel {
            format_version: FORMAT_VERSION,
            global_mean,
            factors: k,
            fold_in_regularization: config.fold_in_regularization,
            rating_scale: (MIN_RATING, MAX_RATING),
            items: items.into_map(),
            users: users.into_map(),
        })
    }
}
