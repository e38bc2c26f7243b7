//! Main entry point for the quotebook binary
//!
//! Wires the quote book to file storage, the system clock and the configured
//! remote source, then runs one command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use url::Url;

use quotebook::{
    services::{http_source::DEFAULT_ENDPOINT, ConfiguredSource, RealFileStorage, SystemClock},
    QuoteBook, QuotebookConfig, Reconciler, SourceKind, SyncEvent, SyncScheduler, NO_QUOTES_MESSAGE,
};
use shared::{component_debug, component_info, logging, CategoryFilter, Component};

type Book = QuoteBook<RealFileStorage, SystemClock>;

/// Persistent quote collection kept in sync with a remote source
#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Collect, filter and sync quotes")]
pub struct Args {
    /// Directory holding the persisted quotes
    #[arg(long, env = "QUOTEBOOK_DATA_DIR", default_value = "./data", global = true)]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "QUOTEBOOK_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Remote source to sync against
    #[arg(long, value_enum, env = "QUOTEBOOK_SOURCE", default_value = "http", global = true)]
    pub source: SourceKind,

    /// Endpoint used by the http source
    #[arg(long, env = "QUOTEBOOK_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: Url,

    /// Seconds between sync cycles in watch mode
    #[arg(long, env = "QUOTEBOOK_SYNC_INTERVAL_SECS", default_value = "10", global = true)]
    pub sync_interval_secs: u64,

    /// Seconds before a fetch or publish is abandoned
    #[arg(long, env = "QUOTEBOOK_FETCH_TIMEOUT_SECS", default_value = "5", global = true)]
    pub fetch_timeout_secs: u64,

    /// Latency of the simulated source in milliseconds
    #[arg(long, env = "QUOTEBOOK_SIMULATED_DELAY_MS", default_value = "1000", global = true)]
    pub simulated_delay_ms: u64,

    /// Do not push newly added quotes to the remote source
    #[arg(long, env = "QUOTEBOOK_NO_PUBLISH", global = true)]
    pub no_publish: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a random quote from the selected category
    Show {
        /// Switch to this category first ("all" for every quote)
        #[arg(long)]
        category: Option<CategoryFilter>,
    },
    /// Add a new quote
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        category: String,
    },
    /// List quotes in a category (defaults to the selected one)
    List {
        #[arg(long)]
        category: Option<CategoryFilter>,
    },
    /// List categories available for filtering
    Categories,
    /// Import quotes from a JSON file holding an array of records
    Import { file: PathBuf },
    /// Export every quote as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a single sync cycle
    Sync,
    /// Sync now and then periodically until Ctrl+C
    Watch,
}

impl Args {
    fn config(&self) -> QuotebookConfig {
        QuotebookConfig {
            data_dir: self.data_dir.clone(),
            source: self.source,
            endpoint: self.endpoint.clone(),
            sync_interval: Duration::from_secs(self.sync_interval_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            simulated_delay: Duration::from_millis(self.simulated_delay_ms),
            publish_new_quotes: !self.no_publish,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up QUOTEBOOK_* settings from a local .env before parsing
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.config();
    config.validate()?;
    component_debug!(Component::Cli, "Configuration: {:?}", config);

    let storage = RealFileStorage::with_base_dir(config.data_dir.clone());
    let book = Arc::new(QuoteBook::open(storage, SystemClock::new()).await?);
    let reconciler = Reconciler::new(ConfiguredSource::from_config(&config)?)
        .with_fetch_timeout(config.fetch_timeout);

    match args.command {
        Command::Show { category } => show(&book, category).await?,
        Command::Add { text, category } => {
            let quote = book.add(&text, &category).await?;
            println!("Added {}", quote.render());
            if config.publishes() && !reconciler.publish(&quote).await {
                println!("Saved locally; the server did not accept it.");
            }
        }
        Command::List { category } => {
            let filter = match category {
                Some(filter) => filter,
                None => book.selected_category().await,
            };
            let quotes = book.filter(&filter).await;
            if quotes.is_empty() {
                println!("{}", NO_QUOTES_MESSAGE);
            }
            for quote in quotes {
                println!("[{}] {}", quote.id, quote.render());
            }
        }
        Command::Categories => {
            let selected = book.selected_category().await;
            for option in book.filter_options().await {
                let marker = if option == selected { "*" } else { " " };
                println!("{} {}", marker, option);
            }
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = book.import_json(&raw).await?;
            println!("Quotes imported successfully! ({})", report.imported_count());
            for rejected in &report.rejected {
                println!("Skipped record {}: {}", rejected.index, rejected.reason);
            }
        }
        Command::Export { output } => {
            let json = book.export_json().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} quotes to {}", book.len().await, path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Sync => {
            let outcome = reconciler.reconcile(&*book).await?;
            if outcome.changed() {
                println!("Quotes synced with server.");
            } else {
                println!("Already up to date.");
            }
        }
        Command::Watch => watch(book, reconciler, config.sync_interval).await?,
    }

    Ok(())
}

async fn show(book: &Book, category: Option<CategoryFilter>) -> anyhow::Result<()> {
    if let Some(filter) = category {
        book.select_category(filter).await?;
    }

    match book.show_random().await? {
        Some(quote) => println!("{}", quote.render()),
        None => println!("{}", NO_QUOTES_MESSAGE),
    }
    Ok(())
}

async fn watch(book: Arc<Book>, reconciler: Reconciler<ConfiguredSource>, period: Duration) -> anyhow::Result<()> {
    logging::log_startup(Component::Scheduler, &format!("sync every {:?}", period));

    let mut scheduler = SyncScheduler::new(book, reconciler, period);
    let mut events = scheduler.subscribe();

    // Set up graceful shutdown
    let shutdown_sender = scheduler.get_shutdown_sender();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(Component::Cli, "Received Ctrl+C signal");
                let _ = shutdown_sender.send(()).await;
            }
            Err(err) => {
                logging::log_error(Component::Cli, "Signal handling", &err);
            }
        }
    });

    // Print a notice whenever a cycle changed something
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SyncEvent::Updated { added, updated }) => {
                    println!("Quotes synced with server. ({} new, {} updated)", added, updated);
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let cycles = scheduler.run().await?;
    component_info!(Component::Cli, "Ran {} sync cycles", cycles);
    logging::log_success(Component::Cli, "Sync stopped gracefully");
    Ok(())
}
