//! # Data Loader Crate
//!
//! This crate loads the MovieLens CSV exports into the in-memory structures
//! the recommenders run on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, Catalog, RatingMatrix)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Build the catalog indices and validate ratings
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, RatingMatrix};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("data/ml-latest-small"))?;
//! let movie = catalog.lookup_by_title("Toy Story (1995)").unwrap();
//! println!("{} has {} attribute tokens", movie.title, movie.attribute_tokens().len());
//!
//! // Only needed for offline training
//! let ratings = RatingMatrix::load_from_dir(Path::new("data/ml-latest-small"))?;
//! ratings.validate(&catalog)?;
//! ```
//!
//! The catalog is immutable once built; share it behind an `Arc`.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{IMDB_FILE, MOVIES_FILE, RATINGS_FILE, TAGS_FILE};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    Catalog,
    RatingMatrix,
    Genre,
    // Rating scale
    MIN_RATING,
    MAX_RATING,
};
