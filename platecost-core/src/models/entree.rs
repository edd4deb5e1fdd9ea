use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Record, RecipeItem};
use crate::store::Collection;

/// A menu entree: component lines costed like a recipe, plus the price the
/// plate sells for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entree {
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
    #[serde(default)]
    pub food_cost: f64,
    #[serde(default)]
    pub price: f64,
    /// Menu price of the plate.
    #[serde(default)]
    pub plate_price: f64,
}

impl Entree {
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
            plate_price: 0.0,
        }
    }

    pub fn with_items(mut self, items: Vec<RecipeItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_plate_price(mut self, price: f64) -> Self {
        self.plate_price = price;
        self
    }

    pub fn with_allergens(mut self, allergens: Vec<String>) -> Self {
        self.allergens = allergens;
        self
    }
}

impl Record for Entree {
    const COLLECTION: Collection = Collection::Entrees;

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

impl fmt::Display for Entree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Plate price: ${:.2}", self.plate_price)?;
        writeln!(f, "Food cost: ${:.2}", self.food_cost)?;

        if !self.allergens.is_empty() {
            writeln!(f, "Allergens: {}", self.allergens.join(", "))?;
        }
        if !self.items.is_empty() {
            writeln!(f, "\nComponents:")?;
            for item in &self.items {
                writeln!(f, "  - {}", item)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entree_new() {
        let entree = Entree::new("Lasagna", "rest-1").with_plate_price(18.5);
        assert_eq!(entree.name, "Lasagna");
        assert_eq!(entree.plate_price, 18.5);
        assert!(!entree.has_id());
    }

    #[test]
    fn test_display() {
        let mut entree = Entree::new("Lasagna", "rest-1")
            .with_plate_price(18.5)
            .with_items(vec![RecipeItem::new("ing-1", 8.0, "oz")]);
        entree.food_cost = 4.25;

        let out = format!("{}", entree);
        assert!(out.contains("Plate price: $18.50"));
        assert!(out.contains("Food cost: $4.25"));
        assert!(out.contains("8 oz of ing-1"));
    }

    #[test]
    fn test_json_roundtrip() {
        let entree = Entree::new("Lasagna", "rest-1").with_plate_price(18.5);
        let json = serde_json::to_string(&entree).unwrap();
        let parsed: Entree = serde_json::from_str(&json).unwrap();
        assert_eq!(entree, parsed);
    }
}
