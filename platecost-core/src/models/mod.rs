//! Shared data models for Platecost.

mod bundle;
mod entree;
mod import_map;
mod ingredient;
mod record;
mod recipe;
mod restaurant;
mod unit_conversion;

pub use bundle::Bundle;
pub use entree::Entree;
pub use import_map::ImportMap;
pub use ingredient::IngredientRecord;
pub use record::Record;
pub use recipe::{Recipe, RecipeItem};
pub use restaurant::Restaurant;
pub use unit_conversion::UnitConversion;
