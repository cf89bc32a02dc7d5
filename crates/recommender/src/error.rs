use sources::SourceError;
use thiserror::Error;

/// Failures a recommendation caller has to tell apart
#[derive(Error, Debug)]
pub enum RecommendError {
    /// A seed title is not in the catalog. The caller can fix the input.
    #[error("Unknown movie: {title:?}")]
    UnknownMovie { title: String },

    /// The catalog, similarity index or rating model could not be loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Scoring or ranking broke mid-request; no partial result is returned
    #[error("Recommendation failed: {0}")]
    Computation(String),
}

impl RecommendError {
    pub fn is_unknown_movie(&self) -> bool {
        matches!(self, RecommendError::UnknownMovie { .. })
    }
}

impl From<SourceError> for RecommendError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::UnknownMovie { title } => RecommendError::UnknownMovie { title },
            other => RecommendError::Computation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rating_model::ModelError;

    #[test]
    fn test_source_errors_map_to_kinds() {
        let unknown: RecommendError = SourceError::UnknownMovie {
            title: "Nope".to_string(),
        }
        .into();
        assert!(unknown.is_unknown_movie());

        let model: RecommendError = SourceError::Model(ModelError::SingularSystem).into();
        assert!(matches!(model, RecommendError::Computation(_)));
        assert!(!model.is_unknown_movie());
    }
}
