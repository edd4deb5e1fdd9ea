use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::store::Collection;

/// A named unit and its multiplicative factor to the category's base unit.
///
/// Unit names are matched case-insensitively. Two conversions with the same
/// name in one load set are ambiguous; the conversion table keeps the first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitConversion {
    #[serde(default)]
    pub id: String,
    pub unit_name: String,
    /// Free-form group label ("weight", "volume", ...). Units convert only
    /// within their category.
    pub category: String,
    pub to_base_factor: f64,
}

impl UnitConversion {
    pub fn new(unit_name: impl Into<String>, category: impl Into<String>, factor: f64) -> Self {
        Self {
            id: String::new(),
            unit_name: unit_name.into(),
            category: category.into(),
            to_base_factor: factor,
        }
    }
}

impl Record for UnitConversion {
    const COLLECTION: Collection = Collection::UnitConversions;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl fmt::Display for UnitConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} base units",
            self.unit_name, self.category, self.to_base_factor
        )
    }
}
