mod crawler;
mod error;
mod extract;
mod fetch;
mod locations;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use scraper::Html;

use crawler::CrawlConfig;
use fetch::{HttpFetcher, PageFetcher};

#[derive(Parser)]
#[command(name = "housing_scraper", about = "California housing scraper for point2homes.com")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover location pages from the top-level index and list them
    Locations,
    /// Crawl every location and write the listings to a CSV table
    Run {
        /// Index pages to walk per location
        #[arg(short = 'n', long, default_value = "1")]
        pages: usize,
        /// Output CSV path (default: dated california-housing file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Concurrent listing fetches within a page
        #[arg(short, long, default_value = "8")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let fetcher = HttpFetcher::new();

    match cli.command {
        Commands::Locations => {
            let config = CrawlConfig::default();
            let index_url = format!("{}{}", config.base_url, config.index_path);
            let html = fetcher.fetch(&index_url).await?;
            let found = {
                let doc = Html::parse_document(&html);
                locations::discover_locations(&doc, &config.location_marker)
            };
            for location in &found {
                println!("{}", location);
            }
            println!("{} locations", found.len());
        }
        Commands::Run {
            pages,
            output,
            concurrency,
        } => {
            let config = CrawlConfig {
                page_limit: pages.max(1),
                concurrency: concurrency.max(1),
                ..CrawlConfig::default()
            };
            let path = output.unwrap_or_else(default_output);

            let (listings, stats) = crawler::run_crawl(&fetcher, &config).await;
            output::write_csv(&path, &listings)?;

            println!(
                "Done: {} locations, {} pages, {} listings kept, {} dropped -> {}",
                stats.locations,
                stats.pages,
                stats.listings,
                stats.dropped,
                path.display()
            );
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn default_output() -> PathBuf {
    PathBuf::from(format!(
        "california-housing-{}.csv",
        chrono::Local::now().format("%Y-%m-%d")
    ))
}
