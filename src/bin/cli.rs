//! Rating widget CLI
//!
//! Local entry point: one-shot scrapes, widget rendering, and the daily
//! schedule loop.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rating_widget::{
    error::Result,
    models::Settings,
    scheduler::{self, Schedule, ScrapeJob},
    services::{RatingPresenter, RatingScraper},
    storage::{ConfigStore, LocalStorage, RatingStore},
};
use url::Url;

/// Store rating scraper and widget renderer
#[derive(Parser, Debug)]
#[command(
    name = "rating-widget",
    version,
    about = "Scrapes a web store listing and renders a star-rating widget"
)]
struct Cli {
    /// Path to storage directory holding the config and snapshot records
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Path to settings file (default: {storage_dir}/settings.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the configured listing page once
    Run,

    /// Print the widget markup for the cached snapshot
    Render {
        /// Also print a <style> block with the widget stylesheet
        #[arg(long)]
        css: bool,
    },

    /// Scrape immediately, then daily at the scheduled time
    Schedule,

    /// Update the stored widget configuration
    SetConfig {
        /// Listing page URL to scrape
        #[arg(long)]
        url: Option<String>,

        /// Caption shown next to the stars
        #[arg(long)]
        text: Option<String>,
    },

    /// Show cached snapshot and configuration state
    Info,

    /// Validate the settings file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| cli.storage_dir.join("settings.toml"));
    let settings = Settings::load_or_default(&settings_path);

    let storage = Arc::new(LocalStorage::new(&cli.storage_dir));

    match cli.command {
        Command::Run => {
            settings.validate()?;
            let scraper = RatingScraper::new(&settings.http, storage.clone(), storage.clone())?;
            let snapshot = scraper.run().await?;
            log::info!(
                "Scraped rating {} ({} reviews)",
                snapshot.rating,
                snapshot.review_count
            );
        }

        Command::Render { css } => {
            let presenter = RatingPresenter::new(storage.clone(), storage.clone());
            let markup = presenter.render().await;

            if css {
                println!("<style>{}</style>", RatingPresenter::stylesheet());
            }
            println!("{}", markup.to_html());
        }

        Command::Schedule => {
            settings.validate()?;
            let scraper = RatingScraper::new(&settings.http, storage.clone(), storage.clone())?;
            let job = Arc::new(ScrapeJob::new(scraper));

            scheduler::run_daily(job, Schedule::from(&settings.schedule)).await;
        }

        Command::SetConfig { url, text } => {
            let mut config = storage.get_config().await?;

            if let Some(url) = url {
                Url::parse(&url)?;
                config.source_url = url;
            }
            if let Some(text) = text {
                config.display_text = text;
            }

            storage.set_config(config).await?;
            log::info!("Configuration updated");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let config = storage.get_config().await?;
            if config.source_url.is_empty() {
                log::info!("Source URL: not set");
            } else {
                log::info!("Source URL: {}", config.source_url);
            }
            log::info!("Display text: {}", config.display_text);

            match storage.get().await? {
                Some(snapshot) => {
                    log::info!(
                        "Cached rating: {} ({} reviews)",
                        snapshot.rating,
                        snapshot.review_count
                    );
                    log::info!("Fetched at: {}", snapshot.fetched_at);
                }
                None => log::info!("No snapshot cached yet."),
            }
        }

        Command::Validate => {
            log::info!("Validating settings...");
            settings.validate()?;
            log::info!("Settings OK");
        }
    }

    Ok(())
}
