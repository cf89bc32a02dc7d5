//! Catalog and RatingMatrix building logic.
//!
//! - Load movies.csv plus the optional attribute files in parallel
//! - Attach tags / keywords / people to their movies
//! - Build the id and title indices
//! - Validate rating references against the catalog

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MOVIES_FILE: &str = "movies.csv";
pub const TAGS_FILE: &str = "tags.csv";
pub const IMDB_FILE: &str = "imdb_data.csv";
pub const RATINGS_FILE: &str = "ratings.csv";

impl Catalog {
    /// Build a catalog from movie records.
    ///
    /// Records are sorted by id. Fails if an id appears twice. For duplicate
    /// titles, the lowest id wins the title index slot.
    pub fn from_movies(mut movies: Vec<Movie>) -> Result<Self> {
        movies.sort_by_key(|m| m.id);

        let mut by_id = HashMap::with_capacity(movies.len());
        let mut by_title = HashMap::with_capacity(movies.len());
        for (pos, movie) in movies.iter().enumerate() {
            if by_id.insert(movie.id, pos).is_some() {
                return Err(DataLoadError::DuplicateMovieId { id: movie.id });
            }
            by_title.entry(movie.title.trim().to_string()).or_insert(pos);
        }

        Ok(Self {
            movies,
            by_id,
            by_title,
        })
    }

    /// Load the catalog from a MovieLens directory.
    ///
    /// `movies.csv` is required. `tags.csv` and `imdb_data.csv` are merged
    /// in when present; rows for unknown movie ids are ignored.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let tags_path = data_dir.join(TAGS_FILE);
        let imdb_path = data_dir.join(IMDB_FILE);

        // Parse all three files in parallel
        let ((movies, tags), imdb) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || optional(&tags_path, parser::parse_tags),
                )
            },
            || optional(&imdb_path, parser::parse_imdb),
        );

        let mut movies = movies?;
        let mut tags = tags?.unwrap_or_default();
        let mut imdb = imdb?.unwrap_or_default();

        for movie in &mut movies {
            if let Some(movie_tags) = tags.remove(&movie.id) {
                movie.tags = movie_tags;
            }
            if let Some(attrs) = imdb.remove(&movie.id) {
                movie.keywords = attrs.keywords;
                movie.people = attrs.people;
            }
        }
        if !tags.is_empty() || !imdb.is_empty() {
            warn!(
                "Ignored attributes for {} unknown movie ids",
                tags.len() + imdb.len()
            );
        }

        let catalog = Self::from_movies(movies)?;
        info!("Catalog loaded: {} movies", catalog.len());
        Ok(catalog)
    }
}

/// Parse a file only if it exists.
fn optional<T>(path: &Path, parse: fn(&Path) -> Result<T>) -> Result<Option<T>> {
    if path.exists() {
        parse(path).map(Some)
    } else {
        debug!("Optional file {:?} not found, skipping", path);
        Ok(None)
    }
}

impl RatingMatrix {
    /// Load ratings.csv from a MovieLens directory.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(RATINGS_FILE);
        info!("Loading ratings from {:?}", path);
        let ratings = parser::parse_ratings(&path)?;
        let matrix = Self::from_ratings(ratings);
        info!(
            "Loaded {} ratings from {} users",
            matrix.len(),
            matrix.user_count()
        );
        Ok(matrix)
    }

    /// Validate data integrity against the catalog
    ///
    /// Check that:
    /// - All rating.movie_id references exist in the catalog
    /// - Ratings are in valid range (0.5 - 5.0)
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for rating in &self.ratings {
            if catalog.get_movie(rating.movie_id).is_none() {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, with_tags: bool) {
        fs::write(
            dir.path().join(MOVIES_FILE),
            "movieId,title,genres\n\
             3,Grumpier Old Men (1995),Comedy|Romance\n\
             1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
             2,Jumanji (1995),Adventure|Children|Fantasy\n",
        )
        .unwrap();
        if with_tags {
            fs::write(
                dir.path().join(TAGS_FILE),
                "userId,movieId,tag,timestamp\n\
                 1,1,Pixar,1\n\
                 1,999,orphan,2\n",
            )
            .unwrap();
        }
    }

    #[test]
    fn test_load_catalog_sorted_with_tags() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, true);

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();
        let ids: Vec<MovieId> = catalog.all().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.get_movie(1).unwrap().tags, vec!["pixar".to_string()]);
        assert!(catalog.get_movie(2).unwrap().tags.is_empty());
    }

    #[test]
    fn test_load_catalog_without_optional_files() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, false);

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_catalog_with_unknown_genre() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MOVIES_FILE),
            "movieId,title,genres\n\
             1,Toy Story (1995),Animation|Comedy\n\
             2,Odd One (2020),Comedy|Vaporwave\n",
        )
        .unwrap();

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_movie(2).unwrap().genres, vec![Genre::Comedy]);
    }

    #[test]
    fn test_load_catalog_missing_movies_file() {
        let dir = TempDir::new().unwrap();
        let result = Catalog::load_from_dir(dir.path());
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let movies = vec![Movie::new(1, "A (2000)"), Movie::new(1, "B (2001)")];
        let result = Catalog::from_movies(movies);
        assert!(matches!(result, Err(DataLoadError::DuplicateMovieId { id: 1 })));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_lowest_id() {
        let movies = vec![
            Movie::new(20, "Hamlet (2000)"),
            Movie::new(7, "Hamlet (2000)"),
            Movie::new(9, "Hamlet (1996)"),
        ];
        let catalog = Catalog::from_movies(movies).unwrap();
        assert_eq!(catalog.lookup_by_title("Hamlet (2000)").unwrap().id, 7);
        assert_eq!(catalog.lookup_by_title("  Hamlet (1996) ").unwrap().id, 9);
        assert!(catalog.lookup_by_title("Hamlet").is_none());
    }

    #[test]
    fn test_rating_matrix_summary() {
        let matrix = RatingMatrix::from_ratings(vec![
            Rating { user_id: 1, movie_id: 1, rating: 4.0, timestamp: 0 },
            Rating { user_id: 2, movie_id: 1, rating: 5.0, timestamp: 0 },
            Rating { user_id: 2, movie_id: 2, rating: 1.0, timestamp: 0 },
        ]);

        assert_eq!(matrix.len(), 3);
        assert!((matrix.global_mean() - 10.0 / 3.0).abs() < 1e-6);
        assert_eq!(matrix.user_count(), 2);
    }

    #[test]
    fn test_validate_rejects_unknown_movie_and_bad_rating() {
        let catalog = Catalog::from_movies(vec![Movie::new(1, "A (2000)")]).unwrap();

        let unknown = RatingMatrix::from_ratings(vec![Rating {
            user_id: 1,
            movie_id: 2,
            rating: 3.0,
            timestamp: 0,
        }]);
        assert!(matches!(
            unknown.validate(&catalog),
            Err(DataLoadError::MissingReference { id: 2, .. })
        ));

        let out_of_range = RatingMatrix::from_ratings(vec![Rating {
            user_id: 1,
            movie_id: 1,
            rating: 7.0,
            timestamp: 0,
        }]);
        assert!(matches!(
            out_of_range.validate(&catalog),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }
}
