use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use jobscout::config::AppConfig;
use jobscout::dataset::DatasetStore;
use jobscout::search::SearchClient;
use jobscout::web::start_web_server;

#[derive(Parser)]
#[command(
    name = "jobscout",
    about = "Search job postings and collect them into a dataset"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web form server (the default)
    Serve,
    /// Run a single search and merge the results into the dataset
    Fetch {
        /// Full search query, e.g. "computer science faculty jobs Gulf"
        query: String,
        /// Result pages to request, 10 results per page
        #[arg(long, default_value_t = 10)]
        pages: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        None | Some(Command::Serve) => start_web_server(config).await,
        Some(Command::Fetch { query, pages }) => fetch_once(config, &query, pages).await,
    }
}

/// One-shot fetch: same pipeline as a form submission, minus the web server.
async fn fetch_once(config: AppConfig, query: &str, pages: usize) -> Result<()> {
    let client = SearchClient::new(&config)?;
    let store = DatasetStore::new(config.dataset_path.clone());

    let postings = client.fetch(query, pages).await;
    if postings.is_empty() {
        warn!("No postings found for '{}'", query);
        return Ok(());
    }

    let report = store.merge_and_save(&postings).await?;
    if report.prior_discarded {
        warn!("Prior dataset rows were discarded during this save");
    }
    info!(
        "Saved {} fetched postings to {} ({} rows total)",
        report.new_rows,
        store.path().display(),
        report.total_rows
    );
    Ok(())
}
