//! The shared call contract and strategy selection.

use crate::error::{RecommendError, Result};
use data_loader::{Catalog, MovieId};
use pipeline::FilterPipeline;
use sources::{Candidate, SeedContext};
use std::fmt;
use std::str::FromStr;

/// One ranked result
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Aggregated similarity (content) or predicted rating (collaborative)
    pub score: f32,
}

/// Three seed titles in, up to `top_n` ranked titles out.
///
/// ## Contract
/// - Every seed title must be in the catalog, otherwise `UnknownMovie`,
///   even when `top_n` is 0.
/// - Results are distinct titles and never a seed title.
/// - Fewer than `top_n` results only when the catalog runs out.
/// - Same seeds and `top_n`, same output; the result for `k` is a prefix
///   of the result for `k + 1`.
pub trait Recommender: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Ranked results with ids and scores
    fn recommend_scored(&self, seed_titles: &[&str; 3], top_n: usize) -> Result<Vec<Recommendation>>;

    /// Ranked titles only
    fn recommend(&self, seed_titles: &[&str; 3], top_n: usize) -> Result<Vec<String>> {
        Ok(self
            .recommend_scored(seed_titles, top_n)?
            .into_iter()
            .map(|r| r.title)
            .collect())
    }
}

/// Run ranked candidates through the filters and cut to `top_n`
pub(crate) fn finalize(
    catalog: &Catalog,
    filters: &FilterPipeline,
    candidates: Vec<Candidate>,
    context: &SeedContext,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    let mut ranked = filters
        .apply(candidates, context)
        .map_err(|e| RecommendError::Computation(format!("{e:#}")))?;
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .map(|candidate| {
            let movie = catalog.get_movie(candidate.movie_id).ok_or_else(|| {
                RecommendError::Computation(format!("movie {} vanished from the catalog", candidate.movie_id))
            })?;
            Ok(Recommendation {
                movie_id: movie.id,
                title: movie.title.clone(),
                score: candidate.score,
            })
        })
        .collect()
}

/// Which recommender serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Content,
    Collaborative,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Content, Strategy::Collaborative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Content => "content",
            Strategy::Collaborative => "collaborative",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content" | "content-based" => Ok(Strategy::Content),
            "collaborative" | "collab" => Ok(Strategy::Collaborative),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'content' or 'collaborative')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_and_display() {
        assert_eq!("content".parse::<Strategy>(), Ok(Strategy::Content));
        assert_eq!(" Collab ".parse::<Strategy>(), Ok(Strategy::Collaborative));
        assert!("popularity".parse::<Strategy>().is_err());

        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }
}
