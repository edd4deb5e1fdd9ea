//! Master ingredient list commands.

use clap::{Args, Subcommand};

use platecost_core::{HttpRemote, IngredientRecord, SyncCoordinator};

/// Browse the master ingredient list
#[derive(Debug, Args)]
pub struct IngredientCommand {
    #[command(subcommand)]
    command: IngredientSubcommand,
}

#[derive(Debug, Subcommand)]
enum IngredientSubcommand {
    /// List the current restaurant's ingredients
    List {
        /// Filter by supplier name (case-insensitive)
        #[arg(long)]
        supplier: Option<String>,
    },
}

impl IngredientCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            IngredientSubcommand::List { supplier } => {
                let mut ingredients: Vec<IngredientRecord> = coordinator.list().await?;
                if let Some(supplier) = supplier {
                    ingredients.retain(|i| i.supplier_name.eq_ignore_ascii_case(supplier));
                }

                if ingredients.is_empty() {
                    println!("No ingredients found.");
                    println!("Run 'platecost sync pull' or 'platecost import' to load some.");
                    return Ok(());
                }

                ingredients.sort_by(|a, b| a.display_name().cmp(b.display_name()));
                for ingredient in &ingredients {
                    println!("{}", ingredient);
                }
                println!();
                println!("{} ingredients.", ingredients.len());
            }
        }
        Ok(())
    }
}
