//! Benchmarks for candidate generation
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic catalog so the benchmark runs without the dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, Genre, Movie, MovieId};
use rating_model::{PseudoUserProfile, RatingModel, UserSurrogate};
use similarity::{SimilarityConfig, SimilarityIndex};
use sources::{build_seed_context, CollaborativeSource, ContentSource};
use std::sync::Arc;

const CATALOG_SIZE: u32 = 10_000;

const GENRES: [Genre; 6] = [
    Genre::Action,
    Genre::Comedy,
    Genre::Drama,
    Genre::Horror,
    Genre::Romance,
    Genre::Thriller,
];

fn synthetic_catalog() -> Catalog {
    let movies = (1..=CATALOG_SIZE)
        .map(|id| {
            let genres = vec![GENRES[id as usize % 6], GENRES[(id as usize / 6) % 6]];
            let tags = [format!("tag{}", id % 97), format!("tag{}", id % 89)];
            Movie::new(id, format!("Movie {id} ({})", 1950 + id % 70))
                .with_genres(genres)
                .with_tags(&tags)
        })
        .collect();
    Catalog::from_movies(movies).expect("synthetic catalog is valid")
}

/// Cheap deterministic model so the benchmark measures the source itself
struct HashScores;

impl RatingModel for HashScores {
    fn name(&self) -> &str {
        "hash"
    }

    fn condition(&self, _profile: &PseudoUserProfile) -> rating_model::Result<UserSurrogate> {
        Ok(UserSurrogate::default())
    }

    fn predict(&self, _user: &UserSurrogate, movie_id: MovieId) -> f32 {
        (movie_id.wrapping_mul(2_654_435_761) % 1000) as f32 / 200.0
    }
}

const SEEDS: [&str; 3] = ["Movie 1 (1951)", "Movie 2 (1952)", "Movie 3 (1953)"];

fn bench_content_candidates(c: &mut Criterion) {
    let catalog = synthetic_catalog();
    let index = SimilarityIndex::build(&catalog, &SimilarityConfig::default()).unwrap();
    let content = ContentSource::new(Arc::new(index));
    let context = build_seed_context(&catalog, &SEEDS).unwrap();

    c.bench_function("content_get_candidates", |b| {
        b.iter(|| {
            let candidates = content.get_candidates(black_box(&context)).unwrap();
            black_box(candidates)
        })
    });
}

fn bench_collaborative_candidates(c: &mut Criterion) {
    let catalog = Arc::new(synthetic_catalog());
    let collaborative = CollaborativeSource::new(catalog.clone(), Arc::new(HashScores));
    let context = build_seed_context(&catalog, &SEEDS).unwrap();

    c.bench_function("collaborative_get_candidates", |b| {
        b.iter(|| {
            let candidates = collaborative.get_candidates(black_box(&context)).unwrap();
            black_box(candidates)
        })
    });
}

fn bench_build_similarity_index(c: &mut Criterion) {
    let catalog = synthetic_catalog();

    c.bench_function("build_similarity_index", |b| {
        b.iter(|| {
            let index = SimilarityIndex::build(black_box(&catalog), &SimilarityConfig::default()).unwrap();
            black_box(index)
        })
    });
}

criterion_group!(
    benches,
    bench_content_candidates,
    bench_collaborative_candidates,
    bench_build_similarity_index
);
criterion_main!(benches);
