//! # Similarity Crate
//!
//! Content similarity space over the catalog. Each movie becomes a sparse
//! vector over its attribute tokens (genres, tags, plot keywords, people);
//! two movies are compared with cosine similarity.
//!
//! ```ignore
//! use similarity::{SimilarityConfig, SimilarityIndex};
//!
//! let index = SimilarityIndex::build(&catalog, &SimilarityConfig::default())?;
//! let score = index.similarity(1, 3114)?; // Toy Story vs Toy Story 2
//! ```
//!
//! The index is built once after the catalog is loaded and is read-only
//! afterwards, so it can be shared across threads behind an `Arc`.

pub mod error;
pub mod index;
pub mod vectorizer;

pub use error::SimilarityError;
pub use index::SimilarityIndex;
pub use vectorizer::{SimilarityConfig, SparseVector, TokenWeighting, Vocabulary};
