//! Psalms Together CLI - draw and share chapters of Tehillim.

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use clap::{Parser, Subcommand};
use psalms_catalog::{Catalog, JsonCatalog};
use psalms_progress::{ChapterTracker, RandomPicker, SharedTracker, TrackerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod numeral;
mod shell;

use shell::Shell;

#[derive(Parser)]
#[command(name = "psalms")]
#[command(about = "Shared reading of the book of Tehillim", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chapter catalog (JSON array of chapter records)
    #[arg(short, long, default_value = "tehillim.json")]
    catalog: PathBuf,

    /// Length of the drawing animation in milliseconds
    #[arg(long, default_value = "800")]
    draw_delay_ms: u64,

    /// Chapter count to use when the catalog is empty or missing
    #[arg(long, default_value = "150")]
    chapters: usize,

    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Shell,
    /// Print the starting counters as JSON
    Status,
    /// Print one chapter
    Show {
        /// Chapter number
        chapter: u32,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = TrackerConfig {
        draw_delay: Duration::from_millis(cli.draw_delay_ms),
        default_total_chapters: cli.chapters,
    };
    let (catalog, error) = Catalog::load(&JsonCatalog::new(&cli.catalog)).await;
    let mut tracker = ChapterTracker::new(catalog).with_config(config);
    if let Some(error) = error {
        tracker = tracker.with_catalog_error(&error);
    }
    if let Some(seed) = cli.seed {
        tracker = tracker.with_picker(Box::new(RandomPicker::seeded(seed)));
    }
    let tracker = SharedTracker::new(tracker);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            info!("Starting shell with catalog {}", cli.catalog.display());
            Shell::new(tracker).run().await?;
        }
        Commands::Status => {
            let snapshot = tracker.lock().await.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Show { chapter } => {
            let mut viewer = Shell::new(tracker);
            let (output, _) = viewer.execute(shell::Command::Show(chapter)).await;
            println!("{}", output);
        }
    }

    Ok(())
}

