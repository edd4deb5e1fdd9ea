use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::store::Collection;

/// One line of a recipe or entree: a quantity of a master-list ingredient.
///
/// The unit must be convertible to the referenced ingredient's unit
/// category. A stale `ingredient_id` (ingredient deleted from the master
/// list) is tolerated; costing skips the line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeItem {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: String,
}

impl RecipeItem {
    pub fn new(ingredient_id: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for RecipeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} of {}", self.quantity, self.unit, self.ingredient_id)
    }
}

/// A recipe: named, yielded, and costed from its ingredient lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    /// Owning restaurant (tenant) id.
    #[serde(default)]
    pub restaurant_id: String,
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    /// Newline-delimited numbered steps.
    #[serde(default)]
    pub directions: String,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub items: Vec<RecipeItem>,
    /// Computed from the ingredient lines; persisted for display.
    #[serde(default)]
    pub food_cost: f64,
    #[serde(default)]
    pub price: f64,
}

impl Recipe {
    pub fn new(name: impl Into<String>, restaurant_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            restaurant_id: restaurant_id.into(),
            name: name.into(),
            yield_quantity: 0.0,
            yield_unit: String::new(),
            directions: String::new(),
            allergens: Vec::new(),
            items: Vec::new(),
            food_cost: 0.0,
            price: 0.0,
        }
    }

    pub fn with_yield(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.yield_quantity = quantity;
        self.yield_unit = unit.into();
        self
    }

    pub fn with_items(mut self, items: Vec<RecipeItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_directions(mut self, directions: impl Into<String>) -> Self {
        self.directions = directions.into();
        self
    }

    pub fn with_allergens(mut self, allergens: Vec<String>) -> Self {
        self.allergens = allergens;
        self
    }

    /// Directions split back into individual steps.
    pub fn direction_steps(&self) -> Vec<&str> {
        self.directions
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect()
    }
}

impl Record for Recipe {
    const COLLECTION: Collection = Collection::Recipes;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn restaurant_id(&self) -> Option<&str> {
        Some(&self.restaurant_id)
    }

    fn set_restaurant_id(&mut self, restaurant_id: &str) {
        self.restaurant_id = restaurant_id.to_string();
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;

        if self.yield_quantity > 0.0 {
            writeln!(f, "Yield: {} {}", self.yield_quantity, self.yield_unit)?;
        }
        if !self.allergens.is_empty() {
            writeln!(f, "Allergens: {}", self.allergens.join(", "))?;
        }
        writeln!(f, "Food cost: ${:.2}", self.food_cost)?;

        if !self.items.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for item in &self.items {
                writeln!(f, "  - {}", item)?;
            }
        }

        if !self.directions.is_empty() {
            writeln!(f, "\nDirections:\n{}", self.directions)?;
        }

        Ok(())
    }
}
