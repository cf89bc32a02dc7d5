//! Turns movie attribute tokens into sparse, L2-normalized vectors.
//!
//! The vocabulary is every attribute token seen in the catalog (optionally
//! pruned by document frequency), indexed in sorted order so two builds over
//! the same catalog produce identical vectors.

use data_loader::Movie;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a present token is weighted before normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenWeighting {
    /// Every present token weighs 1.0
    #[default]
    Binary,
    /// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`
    TfIdf,
}

/// Settings for building the similarity space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub weighting: TokenWeighting,
    /// Tokens carried by fewer movies than this are dropped
    pub min_token_frequency: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            weighting: TokenWeighting::Binary,
            min_token_frequency: 1,
        }
    }
}

impl SimilarityConfig {
    pub fn with_weighting(mut self, weighting: TokenWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_min_token_frequency(mut self, min: usize) -> Self {
        self.min_token_frequency = min;
        self
    }
}

/// Sparse vector with strictly increasing indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from (index, weight) pairs already sorted by index, then scale to
    /// unit length. An all-zero input stays empty.
    fn normalized(entries: Vec<(u32, f32)>) -> Self {
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        let (indices, values) = entries.into_iter().map(|(i, w)| (i, w / norm)).unzip();
        Self { indices, values }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product by merging the two index lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Token vocabulary with per-token weights
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: BTreeMap<String, u32>,
    weights: Vec<f32>,
}

impl Vocabulary {
    /// Build the vocabulary from per-movie token lists.
    pub fn build(token_lists: &[Vec<String>], config: &SimilarityConfig) -> Self {
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in token_lists {
            for token in tokens {
                *document_frequency.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let n = token_lists.len() as f32;
        let mut index = BTreeMap::new();
        let mut weights = Vec::new();
        for (token, df) in document_frequency {
            if df < config.min_token_frequency {
                continue;
            }
            let weight = match config.weighting {
                TokenWeighting::Binary => 1.0,
                TokenWeighting::TfIdf => ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0,
            };
            index.insert(token.to_string(), weights.len() as u32);
            weights.push(weight);
        }

        Self { index, weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of a token, if it is in the vocabulary
    pub fn weight(&self, token: &str) -> Option<f32> {
        self.index.get(token).map(|&i| self.weights[i as usize])
    }

    /// Vectorize a (sorted, deduplicated) token list. Unknown tokens are skipped.
    pub fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut entries: Vec<(u32, f32)> = tokens
            .iter()
            .filter_map(|t| self.index.get(t).map(|&i| (i, self.weights[i as usize])))
            .collect();
        entries.sort_unstable_by_key(|(i, _)| *i);
        entries.dedup_by_key(|(i, _)| *i);
        SparseVector::normalized(entries)
    }
}

/// Attribute tokens for every movie, in the given order
pub fn movie_tokens(movies: &[Movie]) -> Vec<Vec<String>> {
    movies.iter().map(|m| m.attribute_tokens()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_binary_vectors_are_unit_length() {
        let lists = vec![tokens(&["genre:action", "genre:crime"]), tokens(&["genre:action"])];
        let vocab = Vocabulary::build(&lists, &SimilarityConfig::default());

        let v = vocab.vectorize(&lists[0]);
        assert_eq!(v.nnz(), 2);
        assert!((v.dot(&v) - 1.0).abs() < 1e-6);

        let w = vocab.vectorize(&lists[1]);
        // cos = 1 / sqrt(2)
        assert!((v.dot(&w) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_tfidf_downweights_common_tokens() {
        let lists = vec![
            tokens(&["genre:drama", "tag:heist"]),
            tokens(&["genre:drama"]),
            tokens(&["genre:drama"]),
        ];
        let config = SimilarityConfig::default().with_weighting(TokenWeighting::TfIdf);
        let vocab = Vocabulary::build(&lists, &config);

        let common = vocab.weight("genre:drama").unwrap();
        let rare = vocab.weight("tag:heist").unwrap();
        assert!(rare > common);
        assert!((common - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_min_token_frequency_prunes() {
        let lists = vec![tokens(&["genre:drama", "tag:once"]), tokens(&["genre:drama"])];
        let config = SimilarityConfig::default().with_min_token_frequency(2);
        let vocab = Vocabulary::build(&lists, &config);

        assert_eq!(vocab.len(), 1);
        assert!(vocab.weight("tag:once").is_none());
    }

    #[test]
    fn test_empty_token_list_gives_empty_vector() {
        let vocab = Vocabulary::build(&[tokens(&["genre:drama"])], &SimilarityConfig::default());
        let v = vocab.vectorize(&[]);
        assert!(v.is_empty());
        assert_eq!(v.dot(&vocab.vectorize(&tokens(&["genre:drama"]))), 0.0);
    }
}
