//! Export and import of data bundles.

use clap::Args;
use std::path::PathBuf;

use platecost_core::{Bundle, HttpRemote, SyncCoordinator};

use crate::config::Config;

/// Merge a bundle file into the current restaurant's data
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Bundle file produced by `platecost export`
    file: PathBuf,
}

impl ImportCommand {
    pub async fn run(
        &self,
        coordinator: &mut SyncCoordinator<HttpRemote>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bytes = tokio::fs::read(&self.file)
            .await
            .map_err(|e| format!("Failed to read '{}': {}", self.file.display(), e))?;
        let bundle: Bundle = serde_json::from_slice(&bytes)
            .map_err(|e| format!("'{}' is not a valid bundle: {}", self.file.display(), e))?;

        if bundle.is_empty() {
            println!("Bundle is empty; nothing to import.");
            return Ok(());
        }

        // Online imports also push each newly added record.
        if config.remote.is_configured() {
            coordinator.probe().await?;
        }

        let summary = coordinator.import_bundle(bundle).await?;
        println!("✓ Import complete: {}.", summary);
        if summary.total() == 0 {
            println!("All records were already present or carried no id.");
        }
        Ok(())
    }
}

/// Write the current restaurant's data to a bundle file
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Destination file
    file: PathBuf,
}

impl ExportCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bundle = coordinator.export_bundle().await?;
        let bytes = serde_json::to_vec_pretty(&bundle)?;
        tokio::fs::write(&self.file, &bytes)
            .await
            .map_err(|e| format!("Failed to write '{}': {}", self.file.display(), e))?;

        println!(
            "✓ Exported {} ingredients, {} recipes, {} entrees to {}",
            bundle.ingredients.len(),
            bundle.recipes.len(),
            bundle.entrees.len(),
            self.file.display()
        );
        Ok(())
    }
}
