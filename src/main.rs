//! Aynary Bridge - send a selected word to the Aynary dictionary
//!
//! Desktop front end for the dispatch controller.

use anyhow::{Context, Result};
use aynary_bridge::config::Config;
use aynary_bridge::controller::{DispatchController, DispatchReport};
use aynary_bridge::menu::{self, MenuItem, MenuRegistry};
use aynary_bridge::selection::CommandSelectionProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file to use instead of the default
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up selected text (one dispatch per argument)
    Define {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Look up the current desktop selection
    Shortcut,
    /// Print the context menu entry
    Menu,
}

/// Prints registered items as JSON for the platform shim to pick up
struct PrintRegistry;

impl MenuRegistry for PrintRegistry {
    fn register(&mut self, item: MenuItem) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&item)?);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging
    let level = if args.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("📘 Aynary Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Commands::Menu = args.command {
        return menu::initialize(&mut PrintRegistry);
    }

    let controller =
        DispatchController::from_config(&config).context("Invalid bridge configuration")?;

    match args.command {
        Commands::Define { text } => {
            let handles: Vec<_> = text
                .iter()
                .filter_map(|selection| controller.on_trigger(selection))
                .collect();
            if handles.is_empty() {
                info!("Nothing to look up");
            }
            for joined in futures::future::join_all(handles).await {
                report(joined.context("Dispatch task panicked")?);
            }
        }
        Commands::Shortcut => {
            let provider = Arc::new(CommandSelectionProvider::new(&config.selection_command)?);
            match controller.on_shortcut(provider).await? {
                Some(dispatched) => report(dispatched),
                None => info!("Nothing to look up"),
            }
        }
        Commands::Menu => {}
    }

    Ok(())
}

fn report(report: DispatchReport) {
    match &report.fallback {
        Some(target) => warn!("'{}' sent to fallback {}", report.word, target),
        None => info!("✅ '{}' -> {:?}", report.word, report.outcome.state()),
    }
}
