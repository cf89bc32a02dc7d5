//! Example: Generate candidates for three seed movies
//!
//! Run with: cargo run --package sources --example generate_candidates
//!
//! This example shows how to:
//! 1. Load the MovieLens catalog
//! 2. Resolve three seed titles
//! 3. Generate content candidates
//! 4. Generate collaborative candidates from a trained model (if present)
//! 5. Display the results

use data_loader::Catalog;
use rating_model::FactorModel;
use similarity::{SimilarityConfig, SimilarityIndex};
use sources::{build_seed_context, CollaborativeSource, ContentSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const SEEDS: [&str; 3] = [
    "Toy Story (1995)",
    "Monsters, Inc. (2001)",
    "Finding Nemo (2003)",
];

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Seed Candidate Generation Example ===\n");

    println!("Loading MovieLens catalog...");
    let start = Instant::now();
    let data_dir = Path::new("data/ml-latest-small");
    let catalog = Arc::new(Catalog::load_from_dir(data_dir)?);
    println!("Loaded {} movies in {:?}\n", catalog.len(), start.elapsed());

    let context = build_seed_context(&catalog, &SEEDS)?;
    println!("Seeds: {:?}\n", context.seed_ids);

    // Content candidates
    let start = Instant::now();
    let index = Arc::new(SimilarityIndex::build(&catalog, &SimilarityConfig::default())?);
    println!("Built similarity index ({} tokens) in {:?}", index.vocabulary().len(), start.elapsed());

    let content = ContentSource::new(index);
    let start = Instant::now();
    let content_candidates = content.get_candidates(&context)?;
    println!(
        "Generated {} content candidates in {:?}",
        content_candidates.len(),
        start.elapsed()
    );

    println!("\nTop 5 Content Candidates:");
    for (i, candidate) in content_candidates.iter().take(5).enumerate() {
        if let Some(movie) = catalog.get_movie(candidate.movie_id) {
            println!("  {}. {} (Score: {:.3})", i + 1, movie.title, candidate.score);
            println!("     - Similar to {} of 3 seeds", candidate.metadata.matched_seeds);
        }
    }

    // Collaborative candidates need a trained artifact
    let model_path = Path::new("models/model.json");
    if !model_path.exists() {
        println!("\nNo model at {:?}; run `movie-recs train` first.", model_path);
        return Ok(());
    }
    let model = Arc::new(FactorModel::load(model_path)?);
    let collaborative = CollaborativeSource::new(catalog.clone(), model);
    let start = Instant::now();
    let collaborative_candidates = collaborative.get_candidates(&context)?;
    println!(
        "\nGenerated {} collaborative candidates in {:?}",
        collaborative_candidates.len(),
        start.elapsed()
    );

    println!("\nTop 5 Collaborative Candidates:");
    for (i, candidate) in collaborative_candidates.iter().take(5).enumerate() {
        if let Some(movie) = catalog.get_movie(candidate.movie_id) {
            println!("  {}. {} (Predicted: {:.2})", i + 1, movie.title, candidate.score);
        }
    }

    Ok(())
}
