use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::store::Collection;

/// A master-list ingredient as purchased from a supplier.
///
/// Case pricing is the costing input: `case_price` buys `case_quantity` of
/// `unit`. The unit must resolve in the conversion table for recipe lines
/// quoted in other units to cost correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientRecord {
    #[serde(default)]
    pub id: String,
    /// Owning restaurant (tenant) id.
    #[serde(default)]
    pub restaurant_id: String,
    pub supplier_name: String,
    pub item_name: String,
    /// Display override; empty means show `item_name`.
    #[serde(default)]
    pub alias_name: String,
    pub case_price: f64,
    pub case_quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub sku: String,
}

impl IngredientRecord {
    pub fn new(item_name: impl Into<String>, restaurant_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            restaurant_id: restaurant_id.into(),
            supplier_name: String::new(),
            item_name: item_name.into(),
            alias_name: String::new(),
            case_price: 0.0,
            case_quantity: 0.0,
            unit: String::new(),
            sku: String::new(),
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier_name = supplier.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias_name = alias.into();
        self
    }

    pub fn with_case(mut self, price: f64, quantity: f64, unit: impl Into<String>) -> Self {
        self.case_price = price;
        self.case_quantity = quantity;
        self.unit = unit.into();
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    /// Name shown in lists: the alias when one is set.
    pub fn display_name(&self) -> &str {
        if self.alias_name.is_empty() {
            &self.item_name
        } else {
            &self.alias_name
        }
    }
}

impl Record for IngredientRecord {
    const COLLECTION: Collection = Collection::Ingredients;

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

impl fmt::Display for IngredientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2} per {} {}",
            self.display_name(),
            self.case_price,
            self.case_quantity,
            self.unit
        )?;
        if !self.supplier_name.is_empty() {
            write!(f, " from {}", self.supplier_name)?;
        }
        Ok(())
    }
}
