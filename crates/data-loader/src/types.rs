//! Core domain types for the movie catalog and rating data.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Movie` records with their content attributes
//! - `Catalog`, the immutable id/title indexed movie table
//! - `RatingMatrix`, the historical user-item ratings used for offline training

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user in the ratings file
pub type UserId = u32;

/// Unique identifier for a movie (MovieLens `movieId`)
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A single catalog entry.
///
/// Content attributes come from three places: the genre column of
/// `movies.csv`, user tags from `tags.csv`, and plot keywords / people from
/// `imdb_data.csv`. Only the genres are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    pub genres: Vec<Genre>,
    /// Lower-cased, deduplicated user tags
    pub tags: Vec<String>,
    /// Lower-cased, deduplicated plot keywords
    pub keywords: Vec<String>,
    /// Director and leading cast members
    pub people: Vec<String>,
}

impl Movie {
    /// Create a movie with no attributes. The year is parsed from the title.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        let title = title.into();
        let year = crate::parser::extract_year_from_title(&title);
        Self {
            id,
            title,
            year,
            genres: Vec::new(),
            tags: Vec::new(),
            keywords: Vec::new(),
            people: Vec::new(),
        }
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = normalize_terms(tags.iter().map(|t| t.as_ref()));
        self
    }

    pub fn with_keywords<S: AsRef<str>>(mut self, keywords: &[S]) -> Self {
        self.keywords = normalize_terms(keywords.iter().map(|k| k.as_ref()));
        self
    }

    pub fn with_people<S: AsRef<str>>(mut self, people: &[S]) -> Self {
        self.people = normalize_terms(people.iter().map(|p| p.as_ref()));
        self
    }

    /// All content attributes as namespaced tokens, sorted and deduplicated.
    ///
    /// Example: `["genre:action", "person:james cameron", "tag:time travel"]`
    pub fn attribute_tokens(&self) -> Vec<String> {
        let mut tokens = BTreeSet::new();
        for genre in &self.genres {
            tokens.insert(format!("genre:{}", genre.name().to_lowercase()));
        }
        for tag in &self.tags {
            tokens.insert(format!("tag:{}", tag));
        }
        for keyword in &self.keywords {
            tokens.insert(format!("keyword:{}", keyword));
        }
        for person in &self.people {
            tokens.insert(format!("person:{}", person));
        }
        tokens.into_iter().collect()
    }
}

/// Lower-case, trim, drop empties, sort and dedup free-text terms.
pub(crate) fn normalize_terms<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<String> = terms
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Movie genres from MovieLens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    FilmNoir,
    Horror,
    Imax,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// The label used in `movies.csv`
    pub fn name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Children => "Children",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::FilmNoir => "Film-Noir",
            Genre::Horror => "Horror",
            Genre::Imax => "IMAX",
            Genre::Musical => "Musical",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// Represents a single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0 in half-star steps
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// Lowest rating MovieLens allows
pub const MIN_RATING: f32 = 0.5;
/// Highest rating MovieLens allows
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Catalog - the immutable movie table
// =============================================================================

/// Immutable, in-memory movie table.
///
/// Records are kept in ascending id order, so "catalog order" and
/// "id ascending" are the same thing. Titles may repeat; a title lookup
/// resolves to the first record in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) by_id: HashMap<MovieId, usize>,
    pub(crate) by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Resolve an exact title to its record.
    ///
    /// Surrounding whitespace is ignored. Returns `None` when no movie has
    /// this title.
    pub fn lookup_by_title(&self, title: &str) -> Option<&Movie> {
        self.by_title
            .get(title.trim())
            .map(|&pos| &self.movies[pos])
    }

    /// Every record, in catalog order
    pub fn all(&self) -> &[Movie] {
        &self.movies
    }

    /// Position of a movie in catalog order
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches;
    /// each group stays in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Movie> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for movie in &self.movies {
            let title = movie.title.to_lowercase();
            if title == query {
                exact.push(movie);
            } else if title.contains(&query) {
                partial.push(movie);
            }
        }
        exact.extend(partial);
        exact
    }
}

// =============================================================================
// RatingMatrix - historical ratings for offline training
// =============================================================================

/// Historical user-item ratings, in file order.
#[derive(Debug, Clone, Default)]
pub struct RatingMatrix {
    pub(crate) ratings: Vec<Rating>,
}

impl RatingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ratings(ratings: Vec<Rating>) -> Self {
        Self { ratings }
    }

    /// All ratings in insertion order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Mean of every rating, or 0.0 when there are none
    pub fn global_mean(&self) -> f32 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let total: f64 = self.ratings.iter().map(|r| r.rating as f64).sum();
        (total / self.ratings.len() as f64) as f32
    }

    /// Number of distinct users
    pub fn user_count(&self) -> usize {
        self.ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<std::collections::HashSet<_>>()
            .len()
    }
}
