//! Restaurant (tenant) selection commands.

use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use platecost_core::{HttpRemote, Record, Restaurant, SyncCoordinator};

/// Manage the restaurant the other commands operate on
#[derive(Debug, Args)]
pub struct RestaurantCommand {
    #[command(subcommand)]
    command: RestaurantSubcommand,
}

#[derive(Debug, Subcommand)]
enum RestaurantSubcommand {
    /// List known restaurants
    List,
    /// Switch to a restaurant, clearing cached data of the others
    Use {
        /// Restaurant id
        id: String,
    },
}

impl RestaurantCommand {
    pub async fn run(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RestaurantSubcommand::List => self.list(coordinator).await,
            RestaurantSubcommand::Use { id } => self.switch(coordinator, id).await,
        }
    }

    async fn list(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let restaurants: Vec<Restaurant> = coordinator.list().await?;
        if restaurants.is_empty() {
            println!("No restaurants cached.");
            println!("Run 'platecost sync pull' to fetch the restaurant list.");
            return Ok(());
        }

        let current = coordinator.session().restaurant_id().to_string();
        for restaurant in &restaurants {
            let marker = if restaurant.id() == current { "*" } else { " " };
            println!("{} {} ({})", marker, restaurant.name, restaurant.id());
        }
        Ok(())
    }

    async fn switch(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
        id: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        coordinator.switch_restaurant(id).await?;
        save_current_restaurant(coordinator.local().data_dir(), id)?;

        let restaurants: Vec<Restaurant> = coordinator.list().await?;
        match restaurants.iter().find(|r| r.id() == id) {
            Some(restaurant) => println!("Switched to restaurant '{}'", restaurant.name),
            None => println!("Switched to restaurant '{}'", id),
        }
        println!("Cached data of other restaurants was cleared.");
        Ok(())
    }
}

fn current_restaurant_path(data_dir: &Path) -> PathBuf {
    data_dir.join("current_restaurant")
}

/// The restaurant id selected with `platecost restaurant use`, if any.
pub fn load_current_restaurant(data_dir: &Path) -> Option<String> {
    fs::read_to_string(current_restaurant_path(data_dir))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn save_current_restaurant(data_dir: &Path, id: &str) -> Result<(), std::io::Error> {
    let path = current_restaurant_path(data_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, id)
}
