//! Offline accuracy checks for a trained model.

use crate::factor::FactorModel;
use data_loader::Rating;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

/// Shuffle with a fixed seed and split off `test_fraction` of the ratings.
///
/// Returns `(train, test)`. The fraction is clamped to `[0, 1]`.
pub fn train_test_split(ratings: &[Rating], test_fraction: f32, seed: u64) -> (Vec<Rating>, Vec<Rating>) {
    let mut shuffled = ratings.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_len = (shuffled.len() as f32 * test_fraction.clamp(0.0, 1.0)).round() as usize;
    let train = shuffled.split_off(test_len);
    (train, shuffled)
}

/// Root mean squared error of clamped predictions over `test`.
///
/// Users are looked up among the training users; unknown users fall back to
/// the item baseline. `None` when `test` is empty.
pub fn rmse(model: &FactorModel, test: &[Rating]) -> Option<f32> {
    if test.is_empty() {
        return None;
    }
    let squared: f64 = test
        .par_iter()
        .map(|r| {
            let user = model.surrogate_for_user(r.user_id);
            let err = (model.predict_clamped(&user, r.movie_id) - r.rating) as f64;
            err * err
        })
        .sum();
    Some((squared / test.len() as f64).sqrt() as f32)
}

/// RMSE of always predicting the training mean, as a floor to beat
pub fn global_mean_rmse(train: &[Rating], test: &[Rating]) -> Option<f32> {
    if train.is_empty() || test.is_empty() {
        return None;
    }
    let mean = train.iter().map(|r| r.rating as f64).sum::<f64>() / train.len() as f64;
    let squared: f64 = test.iter().map(|r| (r.rating as f64 - mean).powi(2)).sum();
    Some((squared / test.len() as f64).sqrt() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::tests::hand_built_model;

    fn rating(user_id: u32, movie_id: u32, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let ratings: Vec<Rating> = (0..100).map(|i| rating(i, i, 3.0)).collect();

        let (train, test) = train_test_split(&ratings, 0.2, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);

        let (train2, test2) = train_test_split(&ratings, 0.2, 7);
        let ids = |v: &[Rating]| v.iter().map(|r| r.user_id).collect::<Vec<_>>();
        assert_eq!(ids(&train), ids(&train2));
        assert_eq!(ids(&test), ids(&test2));
    }

    #[test]
    fn test_rmse_uses_clamped_predictions() {
        let model = hand_built_model(2);
        // User 7 on item 1 predicts 5.25, clamped to 5.0
        let test = vec![rating(7, 1, 5.0)];
        assert!(rmse(&model, &test).unwrap().abs() < 1e-6);
        assert!(rmse(&model, &[]).is_none());
    }

    #[test]
    fn test_global_mean_rmse() {
        let train = vec![rating(1, 1, 2.0), rating(1, 2, 4.0)];
        let test = vec![rating(2, 1, 4.0)];
        assert!((global_mean_rmse(&train, &test).unwrap() - 1.0).abs() < 1e-6);
    }
}
