//! # Sources Crate
//!
//! Candidate generation for seed-based recommendations.
//!
//! ## Components
//!
//! ### Content Source
//! "Movies that look like the ones you picked":
//! - Cosine similarity of attribute vectors to each seed
//! - Per-seed similarities summed (or maxed) into one score
//!
//! ### Collaborative Source
//! "Movies people with your taste rated highly":
//! - The seeds become a synthetic, highly-rated user profile
//! - A trained `RatingModel` predicts a rating for every other movie
//!
//! Both sources return every non-seed movie, sorted by score descending with
//! ties broken by movie id ascending. Truncation to top-n happens later, so a
//! shorter list is always a prefix of a longer one.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{build_seed_context, CollaborativeSource, ContentSource};
//! use std::sync::Arc;
//!
//! let context = build_seed_context(&catalog, &["Heat (1995)", "Casino (1995)", "Se7en (1995)"])?;
//!
//! let content = ContentSource::new(similarity_index.clone());
//! let collaborative = CollaborativeSource::new(catalog.clone(), model.clone());
//!
//! let by_content = content.get_candidates(&context)?;
//! let by_rating = collaborative.get_candidates(&context)?;
//! ```

// Public modules
pub mod collaborative;
pub mod content;
pub mod error;
pub mod seed_context;
pub mod types;

// Re-export commonly used types
pub use collaborative::CollaborativeSource;
pub use content::{Aggregation, ContentSource};
pub use error::{Result, SourceError};
pub use seed_context::build_seed_context;
pub use types::{sort_candidates, Candidate, CandidateMetadata, CandidateSource, SeedContext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(1, CandidateSource::Content, 0.85);
        assert_eq!(candidate.movie_id, 1);
        assert_eq!(candidate.source, CandidateSource::Content);
        assert_eq!(candidate.score, 0.85);
        assert_eq!(candidate.metadata, CandidateMetadata::default());
    }

    #[test]
    fn test_sort_candidates_total_order() {
        let mut candidates = vec![
            Candidate::new(3, CandidateSource::Content, 0.5),
            Candidate::new(1, CandidateSource::Content, 0.5),
            Candidate::new(2, CandidateSource::Content, 0.9),
            Candidate::new(4, CandidateSource::Content, 0.0),
        ];
        sort_candidates(&mut candidates);

        let ids: Vec<_> = candidates.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }
}
