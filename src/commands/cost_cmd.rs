//! Food-cost reporting for recipes and entrees.

use clap::{Args, Subcommand};

use platecost_core::{
    convert, ConversionEngine, Entree, HttpRemote, IngredientRecord, Recipe, RecipeItem,
    Record, SyncCoordinator,
};

/// Compute the food cost of a recipe or entree
#[derive(Debug, Args)]
pub struct CostCommand {
    #[command(subcommand)]
    command: CostSubcommand,
}

#[derive(Debug, Subcommand)]
enum CostSubcommand {
    /// Cost a recipe by name
    Recipe {
        /// Recipe name (case-insensitive)
        name: String,
    },
    /// Cost an entree by name, with plate margin
    Entree {
        /// Entree name (case-insensitive)
        name: String,
    },
}

impl CostCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator<HttpRemote>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        coordinator.refresh_table().await?;
        let engine = ConversionEngine::new(coordinator.table_handle());
        let ingredients: Vec<IngredientRecord> = coordinator.list().await?;

        match &self.command {
            CostSubcommand::Recipe { name } => {
                let recipes: Vec<Recipe> = coordinator.list().await?;
                let recipe = recipes
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| format!("No recipe named '{}'", name))?;

                println!("{}", recipe.name);
                println!("{}", "=".repeat(recipe.name.len()));
                let total = print_lines(&engine, &recipe.items, &ingredients);
                println!();
                println!("Food cost: ${:.2}", total);
                if recipe.yield_quantity > 0.0 {
                    println!(
                        "Cost per {}: ${:.2}",
                        recipe.yield_unit,
                        engine.cost_per_yield_unit(total, recipe.yield_quantity)
                    );
                }
            }
            CostSubcommand::Entree { name } => {
                let entrees: Vec<Entree> = coordinator.list().await?;
                let entree = entrees
                    .iter()
                    .find(|e| e.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| format!("No entree named '{}'", name))?;

                println!("{}", entree.name);
                println!("{}", "=".repeat(entree.name.len()));
                let total = print_lines(&engine, &entree.items, &ingredients);
                println!();
                println!("Food cost:   ${:.2}", total);
                if entree.plate_price > 0.0 {
                    println!("Plate price: ${:.2}", entree.plate_price);
                    println!(
                        "Margin:      ${:.2}",
                        convert::margin(entree.plate_price, total)
                    );
                }
            }
        }
        Ok(())
    }
}

/// Prints one costed line per item and returns the total, zero-costing
/// unresolved or unconvertible lines the same way the engine's aggregate
/// does.
fn print_lines(
    engine: &ConversionEngine,
    items: &[RecipeItem],
    ingredients: &[IngredientRecord],
) -> f64 {
    let mut total = 0.0;
    for item in items {
        let Some(ingredient) = ingredients
            .iter()
            .find(|i| i.has_id() && i.id() == item.ingredient_id)
        else {
            println!(
                "  {:>8.2} {:<6} (missing ingredient)        $0.00",
                item.quantity, item.unit
            );
            continue;
        };

        match engine.line_cost(item, ingredient) {
            Ok(cost) => {
                total += cost;
                println!(
                    "  {:>8.2} {:<6} {:<24} ${:.2}",
                    item.quantity,
                    item.unit,
                    ingredient.display_name(),
                    cost
                );
            }
            Err(e) => {
                println!(
                    "  {:>8.2} {:<6} {:<24} $0.00 ({})",
                    item.quantity,
                    item.unit,
                    ingredient.display_name(),
                    e
                );
            }
        }
    }
    total
}
