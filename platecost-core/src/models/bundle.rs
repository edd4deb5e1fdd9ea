use serde::{Deserialize, Serialize};

use super::{Entree, IngredientRecord, Recipe};

/// The three-collection export/import payload.
///
/// A bundle is produced by one tenant's export and merged into another's
/// local store; the merge contract lives on
/// [`SyncCoordinator::import_bundle`](crate::sync::SyncCoordinator::import_bundle).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Bundle {
    #[serde(default)]
    pub ingredients: Vec<IngredientRecord>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub entrees: Vec<Entree>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.recipes.is_empty() && self.entrees.is_empty()
    }

    /// Total records across all three collections.
    pub fn len(&self) -> usize {
        self.ingredients.len() + self.recipes.len() + self.entrees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let bundle = Bundle::new();
        assert!(bundle.is_empty());
        assert_eq!(bundle.len(), 0);
    }

    #[test]
    fn test_len() {
        let mut bundle = Bundle::new();
        bundle.ingredients.push(IngredientRecord::new("Flour", "rest-1"));
        bundle.recipes.push(Recipe::new("Marinara", "rest-1"));
        assert!(!bundle.is_empty());
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_json_missing_sections_default_empty() {
        let bundle: Bundle = serde_json::from_str(r#"{"ingredients":[]}"#).unwrap();
        assert!(bundle.recipes.is_empty());
        assert!(bundle.entrees.is_empty());
    }
}
