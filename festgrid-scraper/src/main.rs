use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use festgrid_core::domain::Show;
use festgrid_core::reconcile;
use festgrid_core::storage::MemoryStorage;
use festgrid_scraper::config::Config;
use festgrid_scraper::observability::logging::init_logging;
use festgrid_scraper::{fetch, parser};

#[derive(Parser)]
#[command(name = "festgrid-scraper")]
#[command(about = "Festival grid scraper and calendar importer")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "festgrid.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all configured grid pages, parse them, and import the shows
    Scrape {
        /// Print the parsed shows as JSON instead of importing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse a saved grid page and print the extracted shows as JSON
    ParseFile {
        /// Path to an HTML file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Scrape { dry_run } => {
            let client = reqwest::Client::new();
            let mut all_shows: Vec<Show> = Vec::new();
            for url in &config.scrape.urls {
                let html = fetch::fetch_page(&client, url).await?;
                let shows = parser::parse_page(&html, config.scrape.festival_year);
                info!(url = %url, count = shows.len(), "scraped page");
                all_shows.extend(shows);
            }
            info!(total = all_shows.len(), "scrape complete");

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&all_shows)?);
            } else {
                // The deployed host wires its own database-backed Storage in
                // here; the in-memory store exercises the same import path.
                let storage = MemoryStorage::new();
                let summary =
                    reconcile::import_shows(&storage, &all_shows, Utc::now()).await?;
                info!(
                    venues_created = summary.venues_created,
                    events_created = summary.events_created,
                    "import complete"
                );
                println!(
                    "Imported {} events across {} venues",
                    summary.events_created, summary.venues_created
                );
            }
        }
        Commands::ParseFile { path } => {
            let html = std::fs::read_to_string(&path)?;
            let shows = parser::parse_page(&html, config.scrape.festival_year);
            println!("{}", serde_json::to_string_pretty(&shows)?);
        }
    }

    Ok(())
}
