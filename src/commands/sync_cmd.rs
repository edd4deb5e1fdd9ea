//! Sync CLI commands for reconciling the local cache with the remote store.

use clap::{Args, Subcommand};
use platecost_core::{ConnectivityMode, HttpRemote, SyncCoordinator};

use crate::config::Config;

/// Sync with the remote document store
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Push local records up, then pull the remote state down
    Full,
    /// Replace the local cache with the remote state (discards unpushed edits)
    Pull,
    /// Upload local records, assigning ids to new ones
    Push,
    /// Show remote configuration and reachability
    Status,
}

impl SyncCommand {
    pub async fn run(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !config.remote.is_configured() {
            print_not_configured();
            return Ok(());
        }

        match &self.command {
            None | Some(SyncSubcommand::Full) => self.full(coordinator).await,
            Some(SyncSubcommand::Pull) => self.pull(coordinator).await,
            Some(SyncSubcommand::Push) => self.push(coordinator).await,
            Some(SyncSubcommand::Status) => self.status(coordinator, config).await,
        }
    }

    /// Push before pull, so offline edits reach the remote before the full
    /// replace overwrites the local cache.
    async fn full(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !go_online(coordinator).await? {
            println!("✗ remote unreachable; staying offline");
            return Ok(());
        }

        coordinator.push_local_to_remote().await?;
        println!("  ✓ pushed local records");
        coordinator.pull_remote_to_local().await?;
        println!("  ✓ pulled remote state");
        println!();
        println!("Sync complete.");
        Ok(())
    }

    async fn pull(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !go_online(coordinator).await? {
            println!("✗ remote unreachable; staying offline");
            return Ok(());
        }

        coordinator.pull_remote_to_local().await?;
        println!("  ✓ pulled remote state");
        println!();
        println!("Local cache now matches the remote. Unpushed local edits, if any, were replaced.");
        Ok(())
    }

    async fn push(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !go_online(coordinator).await? {
            println!("✗ remote unreachable; staying offline");
            return Ok(());
        }

        coordinator.push_local_to_remote().await?;
        println!("  ✓ pushed local records");
        Ok(())
    }

    async fn status(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("Sync Configuration");
        println!("==================");
        println!();

        println!("Server:     {}", config.remote.server_url.as_deref().unwrap_or("-"));
        println!("Restaurant: {}", config.restaurant_id.value);
        println!("Data dir:   {}", config.data_dir.value.display());
        println!();

        print!("Server status: ");
        match coordinator.probe().await? {
            ConnectivityMode::Online => println!("✓ connected"),
            ConnectivityMode::Offline => println!("✗ unreachable"),
        }
        Ok(())
    }
}

/// Probes the remote, reporting whether the session came up Online.
async fn go_online(
    coordinator: &mut SyncCoordinator<HttpRemote>,
) -> Result<bool, Box<dyn std::error::Error>> {
    Ok(coordinator.probe().await? == ConnectivityMode::Online)
}

fn print_not_configured() {
    println!("Status: Not configured");
    println!();
    println!("To enable sync, add to your config file:");
    println!();
    println!("  remote:");
    println!("    server_url: \"https://store.example.com/v1\"");
    println!("    api_key: \"your-api-key\"");
    println!();
    println!("Or set environment variables:");
    println!("  PLATECOST_REMOTE_URL");
    println!("  PLATECOST_API_KEY");
}
