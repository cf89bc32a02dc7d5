//! Parser for MovieLens CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - tags.csv: userId,movieId,tag,timestamp
//! - imdb_data.csv: movieId,title_cast,director,runtime,budget,plot_keywords
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Titles may be quoted and contain commas, so everything goes through the
//! `csv` crate with serde row structs. Columns a row struct doesn't name are
//! ignored.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// How many cast members from `title_cast` become attributes
const CAST_MEMBERS: usize = 3;

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct TagRow {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImdbRow {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title_cast: Option<String>,
    director: Option<String>,
    plot_keywords: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    timestamp: i64,
}

/// Attributes pulled from imdb_data.csv for one movie
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImdbAttributes {
    pub keywords: Vec<String>,
    pub people: Vec<String>,
}

/// Open a CSV file, mapping a missing file to `FileNotFound`.
fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(file))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Deserialize every row of a CSV file.
fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let label = file_label(path);
    let mut reader = open_reader(path)?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| DataLoadError::from_csv(&label, e)))
        .collect()
}

/// Parse the movies.csv file
///
/// The title often includes year in parentheses: "Toy Story (1995)"
/// Genres are pipe-separated: "Adventure|Animation|Children"
/// Unknown genre labels are logged and skipped.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let rows: Vec<MovieRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let genres = parse_genres(row.movie_id, &row.genres);
            Movie::new(row.movie_id, row.title).with_genres(genres)
        })
        .collect())
}

/// Parse the tags.csv file into per-movie tag lists.
///
/// Tags are lower-cased and deduplicated per movie.
pub fn parse_tags(path: &Path) -> Result<HashMap<MovieId, Vec<String>>> {
    let rows: Vec<TagRow> = read_rows(path)?;
    let mut raw: HashMap<MovieId, Vec<String>> = HashMap::new();
    for row in rows {
        if let Some(tag) = row.tag {
            raw.entry(row.movie_id).or_default().push(tag);
        }
    }
    Ok(raw
        .into_iter()
        .map(|(movie_id, tags)| (movie_id, normalize_terms(tags.iter().map(|t| t.as_str()))))
        .collect())
}

/// Parse the imdb_data.csv file into plot keywords and people per movie.
///
/// Keywords and cast are pipe-separated; only the first few cast members
/// are kept.
pub fn parse_imdb(path: &Path) -> Result<HashMap<MovieId, ImdbAttributes>> {
    let rows: Vec<ImdbRow> = read_rows(path)?;
    let mut attributes = HashMap::new();
    for row in rows {
        let keywords = row
            .plot_keywords
            .as_deref()
            .map(|k| normalize_terms(k.split('|')))
            .unwrap_or_default();

        let mut people: Vec<&str> = row
            .title_cast
            .as_deref()
            .map(|c| c.split('|').take(CAST_MEMBERS).collect())
            .unwrap_or_default();
        if let Some(director) = row.director.as_deref() {
            people.push(director);
        }

        attributes.insert(
            row.movie_id,
            ImdbAttributes {
                keywords,
                people: normalize_terms(people.into_iter()),
            },
        );
    }
    Ok(attributes)
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let rows: Vec<RatingRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|row| Rating {
            user_id: row.user_id,
            movie_id: row.movie_id,
            rating: row.rating,
            timestamp: row.timestamp,
        })
        .collect())
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub(crate) fn extract_year_from_title(title: &str) -> Option<u16> {
    let title = title.trim_end();
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end && end == title.len() - 1 {
        let year_str = &title[start + 1..end];
        if year_str.len() == 4 {
            if let Ok(year) = year_str.parse::<u16>() {
                return Some(year);
            }
        }
    }
    None
}

/// Parse a genre label into Genre enum
///
/// Example: "Action" -> Some(Genre::Action)
///          "Sci-Fi" -> Some(Genre::SciFi)
fn parse_genre(s: &str) -> Option<Genre> {
    let genre = match s {
        "Action" => Genre::Action,
        "Adventure" => Genre::Adventure,
        "Animation" => Genre::Animation,
        // ml-1m spells it with an apostrophe, the newer exports don't
        "Children" | "Children's" => Genre::Children,
        "Comedy" => Genre::Comedy,
        "Crime" => Genre::Crime,
        "Documentary" => Genre::Documentary,
        "Drama" => Genre::Drama,
        "Fantasy" => Genre::Fantasy,
        "Film-Noir" => Genre::FilmNoir,
        "Horror" => Genre::Horror,
        "IMAX" => Genre::Imax,
        "Musical" => Genre::Musical,
        "Mystery" => Genre::Mystery,
        "Romance" => Genre::Romance,
        "Sci-Fi" => Genre::SciFi,
        "Thriller" => Genre::Thriller,
        "War" => Genre::War,
        "Western" => Genre::Western,
        _ => return None,
    };
    Some(genre)
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> vec![Genre::Action, Genre::Adventure, Genre::SciFi]
///          "(no genres listed)" -> vec![]
fn parse_genres(movie_id: MovieId, s: &str) -> Vec<Genre> {
    let s = s.trim();
    if s.is_empty() || s == "(no genres listed)" {
        return Vec::new();
    }
    s.split('|')
        .map(str::trim)
        .filter_map(|label| {
            let genre = parse_genre(label);
            if genre.is_none() {
                warn!("Skipping unknown genre {:?} on movie {}", label, movie_id);
            }
            genre
        })
        .collect()
}
