use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod config;

use commands::{
    load_current_restaurant, ConfigCommand, ConvertCommand, CostCommand, ExportCommand,
    ImportCommand, IngredientCommand, RestaurantCommand, SyncCommand, UnitsCommand,
};
use config::{Config, ConfigSource};
use platecost_core::{ConversionTable, HttpRemote, LocalStore, Session, SyncCoordinator};

#[derive(Parser)]
#[command(name = "platecost")]
#[command(version)]
#[command(about = "Restaurant food costing with offline-first sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync with the remote document store
    Sync(SyncCommand),

    /// Merge a bundle file into the current restaurant's data
    Import(ImportCommand),

    /// Write the current restaurant's data to a bundle file
    Export(ExportCommand),

    /// Convert a quantity between units
    Convert(ConvertCommand),

    /// List known units, grouped by category
    Units(UnitsCommand),

    /// Compute the food cost of a recipe or entree
    Cost(CostCommand),

    /// Browse the master ingredient list
    Ingredient(IngredientCommand),

    /// Manage the restaurant the other commands operate on
    Restaurant(RestaurantCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "platecost=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(execute_command(&cli.command, &config))
}

async fn execute_command(
    command: &Option<Commands>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Sync(cmd)) => {
            let mut coordinator = build_coordinator(config);
            cmd.run(&mut coordinator, config).await?;
        }
        Some(Commands::Import(cmd)) => {
            let mut coordinator = build_coordinator(config);
            cmd.run(&mut coordinator, config).await?;
        }
        Some(Commands::Export(cmd)) => {
            let coordinator = build_coordinator(config);
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Convert(cmd)) => {
            let coordinator = build_coordinator(config);
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Units(cmd)) => {
            let coordinator = build_coordinator(config);
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Cost(cmd)) => {
            let coordinator = build_coordinator(config);
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Ingredient(cmd)) => {
            let coordinator = build_coordinator(config);
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Restaurant(cmd)) => {
            let mut coordinator = build_coordinator(config);
            cmd.run(&mut coordinator).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }
    Ok(())
}

/// Wires the local cache, the remote client, and a fresh session for the
/// current restaurant. The session starts Offline; commands that need the
/// remote probe it explicitly.
fn build_coordinator(config: &Config) -> SyncCoordinator<HttpRemote> {
    let local = LocalStore::new(config.data_dir.value.clone());
    let remote = HttpRemote::new(
        config.remote.server_url.clone().unwrap_or_default(),
        config.remote.api_key.clone().unwrap_or_default(),
    );
    let table = Arc::new(ConversionTable::new());
    let session = Session::new(resolve_restaurant_id(config));
    SyncCoordinator::new(local, remote, table, session)
}

/// The restaurant id the session runs under. A `PLATECOST_RESTAURANT_ID`
/// override wins; otherwise a prior `platecost restaurant use` selection
/// beats the config file's value.
fn resolve_restaurant_id(config: &Config) -> String {
    if config.restaurant_id.source == ConfigSource::Environment {
        return config.restaurant_id.value.clone();
    }
    load_current_restaurant(&config.data_dir.value)
        .unwrap_or_else(|| config.restaurant_id.value.clone())
}
