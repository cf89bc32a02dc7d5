use data_loader::MovieId;
use rating_model::ModelError;
use similarity::SimilarityError;
use thiserror::Error;

/// Errors raised while resolving seeds or scoring candidates
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unknown movie: {title:?}")]
    UnknownMovie { title: String },

    #[error("Movie {0} is in the catalog but not in the similarity index")]
    NotIndexed(MovieId),

    #[error("Similarity computation failed: {0}")]
    Similarity(#[from] SimilarityError),

    #[error("Rating model failed: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, SourceError>;
