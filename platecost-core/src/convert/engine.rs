//! Cost math over the conversion table.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::ConversionTable;
use crate::models::{IngredientRecord, Record, RecipeItem};

/// Errors from unit conversion.
///
/// Both kinds are recoverable: aggregate costing catches them per line item
/// so one bad unit pairing never blocks costing the rest of a recipe.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Unknown unit: {0}")]
    UnitNotFound(String),

    #[error("Cannot convert {from} ({from_category}) to {to} ({to_category})")]
    IncompatibleCategory {
        from: String,
        from_category: String,
        to: String,
        to_category: String,
    },
}

/// Pure cost computation over a shared [`ConversionTable`].
#[derive(Clone)]
pub struct ConversionEngine {
    table: Arc<ConversionTable>,
}

impl ConversionEngine {
    pub fn new(table: Arc<ConversionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    /// Converts `value` from one unit to another.
    ///
    /// Equal unit names (case-insensitive) return `value` unchanged without
    /// touching the table, so trivially-equal conversions work even for
    /// unregistered units. Factors compose through the category's base
    /// unit: `value * from_factor / to_factor`. f64 throughout, no
    /// rounding; display rounding is the caller's concern.
    pub fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConvertError> {
        if from_unit.eq_ignore_ascii_case(to_unit) {
            return Ok(value);
        }

        let (from_category, from_factor) = self
            .table
            .lookup(from_unit)
            .ok_or_else(|| ConvertError::UnitNotFound(from_unit.to_string()))?;
        let (to_category, to_factor) = self
            .table
            .lookup(to_unit)
            .ok_or_else(|| ConvertError::UnitNotFound(to_unit.to_string()))?;

        if from_category != to_category {
            return Err(ConvertError::IncompatibleCategory {
                from: from_unit.to_string(),
                from_category,
                to: to_unit.to_string(),
                to_category,
            });
        }

        Ok(value * from_factor / to_factor)
    }

    /// Cost of `quantity` of an ingredient purchased as `case_quantity` of
    /// `case_unit` for `case_price`.
    ///
    /// A zero case quantity yields a zero cost rather than an error. That
    /// policy hides a real data problem in the ingredient record, so it is
    /// logged; the check runs before any conversion, making the zero result
    /// unconditional on the units involved.
    pub fn cost_of(
        &self,
        quantity: f64,
        quantity_unit: &str,
        case_quantity: f64,
        case_unit: &str,
        case_price: f64,
    ) -> Result<f64, ConvertError> {
        if case_quantity == 0.0 {
            warn!(case_unit, "zero case quantity; costing line as $0.00");
            return Ok(0.0);
        }

        let converted = self.convert(quantity, quantity_unit, case_unit)?;
        Ok(converted / case_quantity * case_price)
    }

    /// Cost of one recipe line against its master-list ingredient.
    pub fn line_cost(
        &self,
        item: &RecipeItem,
        ingredient: &IngredientRecord,
    ) -> Result<f64, ConvertError> {
        self.cost_of(
            item.quantity,
            &item.unit,
            ingredient.case_quantity,
            &ingredient.unit,
            ingredient.case_price,
        )
    }

    /// Total food cost of a recipe or entree.
    ///
    /// Lines referencing an ingredient no longer in the master list, and
    /// lines whose units fail to convert, contribute zero instead of
    /// failing the whole computation. Editing must stay usable with stale
    /// references.
    pub fn recipe_cost(&self, items: &[RecipeItem], ingredients: &[IngredientRecord]) -> f64 {
        let by_id: HashMap<&str, &IngredientRecord> = ingredients
            .iter()
            .filter(|i| i.has_id())
            .map(|i| (i.id(), i))
            .collect();

        items
            .iter()
            .map(|item| {
                let Some(ingredient) = by_id.get(item.ingredient_id.as_str()) else {
                    debug!(
                        ingredient_id = %item.ingredient_id,
                        "unresolved ingredient reference; line costs $0.00"
                    );
                    return 0.0;
                };
                match self.line_cost(item, ingredient) {
                    Ok(cost) => cost,
                    Err(e) => {
                        debug!(
                            ingredient = %ingredient.display_name(),
                            error = %e,
                            "line failed to convert; costing as $0.00"
                        );
                        0.0
                    }
                }
            })
            .sum()
    }

    /// Food cost per unit of yield.
    pub fn cost_per_yield_unit(&self, food_cost: f64, yield_quantity: f64) -> f64 {
        if yield_quantity == 0.0 {
            0.0
        } else {
            food_cost / yield_quantity
        }
    }
}

/// Gross margin of a plate.
pub fn margin(plate_price: f64, food_cost: f64) -> f64 {
    plate_price - food_cost
}
