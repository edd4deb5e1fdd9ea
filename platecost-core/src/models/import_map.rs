use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::store::Collection;

/// A named column mapping from a vendor spreadsheet's headers to canonical
/// ingredient fields.
///
/// Column values hold the vendor's header names, empty when the vendor
/// sheet has no such column. Some vendors combine quantity and unit in one
/// column ("10 lb"); `quantity_unit_column` plus `split_char` designate how
/// to pull them apart. Import maps are shared across restaurants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ImportMap {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub item_name_column: String,
    #[serde(default)]
    pub alias_column: String,
    #[serde(default)]
    pub case_price_column: String,
    #[serde(default)]
    pub sku_column: String,
    #[serde(default)]
    pub pack_column: String,
    #[serde(default)]
    pub size_column: String,
    #[serde(default)]
    pub unit_column: String,
    /// Vendor column carrying quantity and unit together.
    #[serde(default)]
    pub quantity_unit_column: String,
    /// Separator for the combined quantity+unit column.
    #[serde(default)]
    pub split_char: String,
}

impl ImportMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// True when this map expects a combined quantity+unit column.
    pub fn has_combined_quantity(&self) -> bool {
        !self.quantity_unit_column.is_empty() && !self.split_char.is_empty()
    }
}

impl Record for ImportMap {
    const COLLECTION: Collection = Collection::ImportMaps;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl fmt::Display for ImportMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
