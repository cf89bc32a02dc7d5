use data_loader::{Catalog, RatingMatrix};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = Path::new("data/ml-latest-small");

    println!("Loading MovieLens catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(data_dir)?;
    let catalog_elapsed = start.elapsed();

    let start = Instant::now();
    let ratings = RatingMatrix::load_from_dir(data_dir)?;
    ratings.validate(&catalog)?;
    let ratings_elapsed = start.elapsed();

    let tagged = catalog.all().iter().filter(|m| !m.tags.is_empty()).count();

    println!("\n=== Load Complete ===");
    println!("Catalog: {} movies ({} tagged) in {:?}", catalog.len(), tagged, catalog_elapsed);
    println!("Ratings: {} from {} users in {:?}", ratings.len(), ratings.user_count(), ratings_elapsed);
    println!("\nPerformance: {:.0} ratings/second",
             ratings.len() as f64 / ratings_elapsed.as_secs_f64());
    Ok(())
}
