use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, Movie, RatingMatrix};
use rand::seq::index::sample;
use rating_model::{FactorTrainer, TrainConfig};
use recommender::{EngineConfig, RecommendError, RecommendationEngine, Recommendation, Strategy};
use similarity::SimilarityIndex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Movie Recs - three favourite movies in, ten recommendations out
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from three seed titles", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, env = "MOVIE_RECS_DATA_DIR", default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Path to the trained rating model
    #[arg(short, long, env = "MOVIE_RECS_MODEL", default_value = "models/model.json")]
    model: PathBuf,

    /// Optional JSON engine config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Hyperparameters shared by `train` and `evaluate`
#[derive(clap::Args)]
struct TrainArgs {
    /// Latent factors (0 = baseline only)
    #[arg(long, default_value = "20")]
    factors: usize,

    #[arg(long, default_value = "20")]
    epochs: usize,

    #[arg(long, default_value = "0.005")]
    learning_rate: f32,

    #[arg(long, default_value = "0.02")]
    regularization: f32,

    /// RNG seed for initialisation and shuffling
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl TrainArgs {
    fn to_config(&self) -> TrainConfig {
        TrainConfig::default()
            .with_factors(self.factors)
            .with_epochs(self.epochs)
            .with_learning_rate(self.learning_rate)
            .with_regularization(self.regularization)
            .with_seed(self.seed)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies for three seed titles
    Recommend {
        /// content or collaborative
        #[arg(short, long, default_value = "content")]
        strategy: Strategy,

        /// Seed title, exactly as in the catalog (give three times)
        #[arg(long = "movie", required = true)]
        movies: Vec<String>,

        /// Number of recommendations (defaults to the configured top_n)
        #[arg(long)]
        top_n: Option<usize>,

        /// Show movie ids and scores
        #[arg(long)]
        explain: bool,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the movies most similar to one title
    Similar {
        /// Title exactly as in the catalog
        #[arg(long)]
        movie: String,

        #[arg(short, long, default_value = "10")]
        k: usize,
    },

    /// Train the rating model and save it
    Train {
        #[command(flatten)]
        args: TrainArgs,
    },

    /// Train on a split of the ratings and report test RMSE
    Evaluate {
        #[command(flatten)]
        args: TrainArgs,

        /// Share of ratings held out for testing
        #[arg(long, default_value = "0.2")]
        test_fraction: f32,
    },

    /// Run benchmark to test performance
    Benchmark {
        #[arg(short, long, default_value = "content")]
        strategy: Strategy,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Recommend {
            strategy,
            movies,
            top_n,
            explain,
        } => {
            let engine = load_engine(&cli.data_dir, &cli.model, config)?;
            handle_recommend(&engine, strategy, &movies, top_n, explain)?
        }
        Commands::Search { title, limit } => {
            let catalog = load_catalog(&cli.data_dir)?;
            handle_search(&catalog, &title, limit)
        }
        Commands::Similar { movie, k } => {
            let catalog = load_catalog(&cli.data_dir)?;
            handle_similar(&catalog, &config, &movie, k)?
        }
        Commands::Train { args } => handle_train(&cli.data_dir, &cli.model, &args)?,
        Commands::Evaluate {
            args,
            test_fraction,
        } => handle_evaluate(&cli.data_dir, &args, test_fraction)?,
        Commands::Benchmark {
            strategy,
            requests,
            concurrent,
        } => {
            let engine = load_engine(&cli.data_dir, &cli.model, config)?;
            handle_benchmark(engine, strategy, requests, concurrent).await?
        }
    }

    Ok(())
}

fn load_catalog(data_dir: &Path) -> Result<Catalog> {
    println!("Loading MovieLens catalog from {}...", data_dir.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_dir(data_dir).context("Failed to load MovieLens catalog")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(catalog)
}

fn load_engine(data_dir: &Path, model: &Path, config: EngineConfig) -> Result<RecommendationEngine> {
    println!("Loading recommendation engine from {}...", data_dir.display());
    let start = Instant::now();
    let engine = RecommendationEngine::load(data_dir, model, config)
        .context("Failed to start the recommendation engine")?;
    println!(
        "{} Engine ready ({} movies) in {:?}",
        "✓".green(),
        engine.catalog().len(),
        start.elapsed()
    );
    Ok(engine)
}

fn as_seed_triple(movies: &[String]) -> Result<[&str; 3]> {
    match movies {
        [a, b, c] => Ok([a.as_str(), b.as_str(), c.as_str()]),
        _ => bail!("Exactly three --movie titles are required (got {})", movies.len()),
    }
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    strategy: Strategy,
    movies: &[String],
    top_n: Option<usize>,
    explain: bool,
) -> Result<()> {
    let seeds = as_seed_triple(movies)?;

    match engine.recommend_scored(strategy, &seeds, top_n) {
        Ok(recommendations) => {
            print_recommendations(&recommendations, strategy, explain);
            Ok(())
        }
        Err(RecommendError::UnknownMovie { title }) => {
            println!("{} '{}' is not in the catalog.", "Unknown movie:".red().bold(), title);
            let suggestions = engine.catalog().search(&title);
            if !suggestions.is_empty() {
                println!("Did you mean:");
                for movie in suggestions.iter().take(5) {
                    println!("  - {}", movie.title);
                }
            }
            Err(anyhow!("unknown movie {:?}", title))
        }
        Err(err) => {
            tracing::error!("{} recommendation failed: {}", strategy, err);
            println!(
                "{}",
                "Sorry, something went wrong while computing recommendations.".red()
            );
            Err(err.into())
        }
    }
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, title: &str, limit: usize) {
    let matches = catalog.search(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return;
    }
    for movie in matches.iter().take(limit) {
        println!("{}: {} [{}]", movie.id, movie.title, genre_list(movie));
    }
    if matches.len() > limit {
        println!("  ... and {} more", matches.len() - limit);
    }
}

/// Handle the 'similar' command
fn handle_similar(catalog: &Catalog, config: &EngineConfig, title: &str, k: usize) -> Result<()> {
    let movie = catalog
        .lookup_by_title(title)
        .ok_or_else(|| anyhow!("Movie {:?} not found", title))?;
    let index = SimilarityIndex::build(catalog, &config.similarity)?;
    let neighbors = index.neighbors(movie.id, k)?;

    println!("{}", format!("Most similar to {}:", movie.title).bold().blue());
    for (rank, (id, score)) in neighbors.iter().enumerate() {
        if let Some(other) = catalog.get_movie(*id) {
            println!(
                "{}. {} [{}] - Similarity: {:.3}",
                (rank + 1).to_string().green(),
                other.title,
                genre_list(other),
                score
            );
        }
    }
    Ok(())
}

fn load_ratings(data_dir: &Path) -> Result<RatingMatrix> {
    let catalog = load_catalog(data_dir)?;
    let ratings = RatingMatrix::load_from_dir(data_dir).context("Failed to load ratings")?;
    ratings
        .validate(&catalog)
        .context("Ratings do not match the catalog")?;
    println!("{} Loaded {} ratings", "✓".green(), ratings.len());
    Ok(ratings)
}

/// Handle the 'train' command
fn handle_train(data_dir: &Path, output: &Path, args: &TrainArgs) -> Result<()> {
    let ratings = load_ratings(data_dir)?;

    let start = Instant::now();
    let model = FactorTrainer::new(args.to_config()).fit(&ratings)?;
    println!(
        "{} Trained {}-factor model in {:?}",
        "✓".green(),
        args.factors,
        start.elapsed()
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    model.save(output)?;
    println!("{} Saved model to {}", "✓".green(), output.display());
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(data_dir: &Path, args: &TrainArgs, test_fraction: f32) -> Result<()> {
    let ratings = load_ratings(data_dir)?;
    let (train, test) = rating_model::train_test_split(ratings.ratings(), test_fraction, args.seed);
    println!("Split: {} train / {} test ratings", train.len(), test.len());

    let model = FactorTrainer::new(args.to_config()).fit_ratings(&train)?;

    let rmse = rating_model::rmse(&model, &test).ok_or_else(|| anyhow!("Test split is empty"))?;
    let baseline = rating_model::global_mean_rmse(&train, &test).unwrap_or(f32::NAN);

    println!("{}", "Evaluation results:".bold().blue());
    println!("  Model RMSE ({} factors): {:.4}", args.factors, rmse);
    println!("  Global mean RMSE:        {:.4}", baseline);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    strategy: Strategy,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let catalog_len = engine.catalog().len();
    if catalog_len < 3 {
        bail!("Benchmark needs at least three movies in the catalog");
    }
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    // Random seed triples, three distinct movies each
    let mut rng = rand::rng();
    let seed_sets: Vec<[String; 3]> = (0..requests)
        .map(|_| {
            let picks = sample(&mut rng, catalog_len, 3);
            let title = |i: usize| engine.catalog().all()[picks.index(i)].title.clone();
            [title(0), title(1), title(2)]
        })
        .collect();

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for seeds in seed_sets {
        let engine = engine.clone();
        let permit = semaphore.clone().acquire_owned().await?;
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            let titles = [seeds[0].as_str(), seeds[1].as_str(), seeds[2].as_str()];
            engine.recommend(strategy, &titles, None)?;
            Ok::<_, RecommendError>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let average: Duration = timings.iter().sum::<Duration>() / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p).round() as usize];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", format!("Benchmark results ({} strategy):", strategy).bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", average);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn genre_list(movie: &Movie) -> String {
    movie
        .genres
        .iter()
        .map(|g| g.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print recommendations as a 1-indexed list
fn print_recommendations(recommendations: &[Recommendation], strategy: Strategy, explain: bool) {
    println!("{}", format!("Movie Recommendations ({}):", strategy).bold().blue());
    if recommendations.is_empty() {
        println!("  (no movies left to recommend)");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        if explain {
            println!(
                "{}. {} (id {}) - Score: {:.3}",
                (rank + 1).to_string().green(),
                rec.title,
                rec.movie_id,
                rec.score
            );
        } else {
            println!("{}. {}", (rank + 1).to_string().green(), rec.title);
        }
    }
}
