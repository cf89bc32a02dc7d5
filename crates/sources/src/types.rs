//! Candidate and request-context types shared by every source

use data_loader::MovieId;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Which source produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Attribute similarity to the seeds
    Content,
    /// Predicted rating for the pseudo-user
    Collaborative,
}

/// Extra information about how a candidate was scored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateMetadata {
    /// Seeds with a non-zero similarity to this candidate (content only)
    pub matched_seeds: usize,
}

/// A scored movie, before filtering and truncation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    pub source: CandidateSource,
    pub score: f32,
    pub metadata: CandidateMetadata,
}

impl Candidate {
    pub fn new(movie_id: MovieId, source: CandidateSource, score: f32) -> Self {
        Self {
            movie_id,
            source,
            score,
            metadata: CandidateMetadata::default(),
        }
    }

    /// Ranking order: score descending, then movie id ascending.
    ///
    /// Uses `total_cmp`, so the order is total even with NaN scores.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.movie_id.cmp(&other.movie_id))
    }
}

/// Sort candidates into ranking order
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::rank_cmp);
}

/// The resolved seeds of one request.
///
/// Built once per request and read by every source and filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedContext {
    /// Distinct seed ids, ascending
    pub seed_ids: Vec<MovieId>,

    /// Catalog titles of the seeds
    pub seed_titles: HashSet<String>,
}

impl SeedContext {
    pub fn is_seed(&self, movie_id: MovieId) -> bool {
        self.seed_ids.binary_search(&movie_id).is_ok()
    }

    pub fn is_seed_title(&self, title: &str) -> bool {
        self.seed_titles.contains(title)
    }
}
