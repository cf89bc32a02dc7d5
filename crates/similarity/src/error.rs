use data_loader::MovieId;
use thiserror::Error;

/// Errors from building or querying the similarity index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// Nothing to index
    #[error("Cannot build a similarity index over an empty catalog")]
    EmptyCatalog,

    /// The id has no vector in this index
    #[error("Movie {0} is not in the similarity index")]
    UnknownItem(MovieId),
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
