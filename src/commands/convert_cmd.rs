//! Unit conversion and unit catalog commands.

use clap::Args;

use platecost_core::{ConversionEngine, HttpRemote, SyncCoordinator};

/// Convert a quantity between units
#[derive(Debug, Args)]
pub struct ConvertCommand {
    value: f64,
    from_unit: String,
    to_unit: String,
}

impl ConvertCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        coordinator.refresh_table().await?;

        let engine = ConversionEngine::new(coordinator.table_handle());
        let converted = engine.convert(self.value, &self.from_unit, &self.to_unit)?;
        println!(
            "{} {} = {} {}",
            self.value, self.from_unit, converted, self.to_unit
        );
        Ok(())
    }
}

/// List known units, grouped by category
#[derive(Debug, Args)]
pub struct UnitsCommand {
    /// Show only this category
    category: Option<String>,
}

impl UnitsCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        coordinator.refresh_table().await?;
        let table = coordinator.table();

        if table.is_empty() {
            println!("No unit conversions defined.");
            println!("Run 'platecost sync pull' to fetch them from the remote store.");
            return Ok(());
        }

        let categories = match &self.category {
            Some(category) => vec![category.clone()],
            None => table.categories().into_iter().collect(),
        };

        for category in categories {
            let units = table.units_in_category(&category);
            if units.is_empty() {
                println!("No units in category '{}'.", category);
                continue;
            }
            println!("{}:", category);
            for unit in units {
                if let Some((_, factor)) = table.lookup(&unit) {
                    println!("  {} = {} base units", unit, factor);
                }
            }
        }
        Ok(())
    }
}
