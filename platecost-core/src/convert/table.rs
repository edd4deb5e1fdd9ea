//! In-memory catalog of named units and their base-unit factors.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use tracing::warn;

use crate::models::UnitConversion;

struct UnitEntry {
    /// Original-case unit name as loaded.
    name: String,
    category: String,
    to_base_factor: f64,
}

/// Catalog mapping unit names (case-insensitive) to their category and
/// base-unit factor.
///
/// The table is shared process-wide behind an `Arc` and mutated only by
/// [`load`](ConversionTable::load), which builds the replacement map aside
/// and swaps it in under the write lock. Readers never observe a partially
/// built table.
#[derive(Default)]
pub struct ConversionTable {
    units: RwLock<HashMap<String, UnitEntry>>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the table wholesale from a conversion set.
    ///
    /// Duplicate unit names (case-insensitive) within the input keep the
    /// earliest entry; later duplicates are dropped with a warning. This is
    /// a documented ambiguity of the data, not an error.
    pub fn load(&self, conversions: &[UnitConversion]) {
        let mut map = HashMap::with_capacity(conversions.len());
        for conversion in conversions {
            let key = conversion.unit_name.to_lowercase();
            if map.contains_key(&key) {
                warn!(
                    unit = %conversion.unit_name,
                    category = %conversion.category,
                    "duplicate unit name dropped; first definition wins"
                );
                continue;
            }
            map.insert(
                key,
                UnitEntry {
                    name: conversion.unit_name.clone(),
                    category: conversion.category.clone(),
                    to_base_factor: conversion.to_base_factor,
                },
            );
        }

        *self.write_units() = map;
    }

    /// Looks up a unit by name (case-insensitive), returning its category
    /// and base-unit factor.
    pub fn lookup(&self, unit_name: &str) -> Option<(String, f64)> {
        self.read_units()
            .get(&unit_name.to_lowercase())
            .map(|e| (e.category.clone(), e.to_base_factor))
    }

    /// Unit names registered under a category.
    pub fn units_in_category(&self, category: &str) -> BTreeSet<String> {
        self.read_units()
            .values()
            .filter(|e| e.category == category)
            .map(|e| e.name.clone())
            .collect()
    }

    /// Every registered unit name, deduplicated.
    pub fn all_unit_names(&self) -> BTreeSet<String> {
        self.read_units().values().map(|e| e.name.clone()).collect()
    }

    /// Every registered category, deduplicated.
    pub fn categories(&self) -> BTreeSet<String> {
        self.read_units()
            .values()
            .map(|e| e.category.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_units().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_units().is_empty()
    }

    // The map is only ever swapped whole, so a poisoned lock still guards
    // consistent data; recover the guard.
    fn read_units(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, UnitEntry>> {
        self.units.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_units(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, UnitEntry>> {
        self.units.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_set() -> Vec<UnitConversion> {
        vec![
            UnitConversion::new("lb", "weight", 1.0),
            UnitConversion::new("oz", "weight", 0.0625),
            UnitConversion::new("qt", "volume", 1.0),
        ]
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let table = ConversionTable::new();
        table.load(&weight_set());

        let (category, factor) = table.lookup("OZ").unwrap();
        assert_eq!(category, "weight");
        assert_eq!(factor, 0.0625);
        assert_eq!(table.lookup("oz").unwrap().1, 0.0625);
    }

    #[test]
    fn test_lookup_unknown() {
        let table = ConversionTable::new();
        table.load(&weight_set());
        assert!(table.lookup("stone").is_none());
    }

    #[test]
    fn test_first_duplicate_wins_case_insensitive() {
        let table = ConversionTable::new();
        table.load(&[
            UnitConversion::new("oz", "weight", 1.0),
            UnitConversion::new("OZ", "weight", 2.0),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("oz").unwrap().1, 1.0);
        assert_eq!(table.lookup("Oz").unwrap().1, 1.0);
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let table = ConversionTable::new();
        table.load(&weight_set());
        assert_eq!(table.len(), 3);

        table.load(&[UnitConversion::new("g", "weight", 0.00220462)]);
        assert_eq!(table.len(), 1);
        assert!(table.lookup("lb").is_none());
        assert!(table.lookup("g").is_some());
    }

    #[test]
    fn test_units_in_category() {
        let table = ConversionTable::new();
        table.load(&weight_set());

        let weight = table.units_in_category("weight");
        assert_eq!(weight.len(), 2);
        assert!(weight.contains("lb"));
        assert!(weight.contains("oz"));
        assert!(table.units_in_category("volume").contains("qt"));
        assert!(table.units_in_category("nothing").is_empty());
    }

    #[test]
    fn test_all_unit_names() {
        let table = ConversionTable::new();
        table.load(&weight_set());

        let names = table.all_unit_names();
        assert_eq!(names.len(), 3);
        assert!(names.contains("lb"));
        assert!(names.contains("oz"));
        assert!(names.contains("qt"));
    }

    #[test]
    fn test_categories() {
        let table = ConversionTable::new();
        table.load(&weight_set());

        let categories = table.categories();
        assert_eq!(categories.len(), 2);
        assert!(categories.contains("weight"));
        assert!(categories.contains("volume"));
    }

    #[test]
    fn test_empty_table() {
        let table = ConversionTable::new();
        assert!(table.is_empty());
        assert!(table.lookup("lb").is_none());
        assert!(table.all_unit_names().is_empty());
    }
}
