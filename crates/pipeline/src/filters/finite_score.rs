//! Guard against corrupted scores.

use crate::traits::Filter;
use anyhow::{bail, Result};
use sources::{Candidate, SeedContext};

/// Fails the whole request if any candidate has a NaN or infinite score.
///
/// Candidates are never dropped here; a partial ranking is not a result.
pub struct FiniteScoreFilter;

impl Filter for FiniteScoreFilter {
    fn name(&self) -> &str {
        "FiniteScoreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &SeedContext) -> Result<Vec<Candidate>> {
        if let Some(bad) = candidates.iter().find(|c| !c.score.is_finite()) {
            bail!("non-finite score {} for movie {}", bad.score, bad.movie_id);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sources::CandidateSource;
    use std::collections::HashSet;

    fn empty_context() -> SeedContext {
        SeedContext {
            seed_ids: Vec::new(),
            seed_titles: HashSet::new(),
        }
    }

    #[test]
    fn test_passes_finite_scores() {
        let candidates = vec![
            Candidate::new(1, CandidateSource::Collaborative, 4.5),
            Candidate::new(2, CandidateSource::Collaborative, -1.0),
        ];
        let filtered = FiniteScoreFilter.apply(candidates.clone(), &empty_context()).unwrap();
        assert_eq!(filtered, candidates);
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let candidates = vec![
                Candidate::new(1, CandidateSource::Content, 0.5),
                Candidate::new(2, CandidateSource::Content, bad),
            ];
            let err = FiniteScoreFilter.apply(candidates, &empty_context()).unwrap_err();
            assert!(err.to_string().contains("movie 2"));
        }
    }
}
