//! Collection enumeration for local and remote storage.

/// Scope id used for collections that are not tenant-scoped.
pub const GLOBAL_SCOPE: &str = "global";

/// The entity collections the stores know how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    UnitConversions,
    Ingredients,
    Recipes,
    Entrees,
    ImportMaps,
    Restaurants,
}

impl Collection {
    /// The five collections a sync pass processes, in its fixed order.
    pub const SYNC_ORDER: [Collection; 5] = [
        Collection::UnitConversions,
        Collection::Ingredients,
        Collection::Recipes,
        Collection::Entrees,
        Collection::ImportMaps,
    ];

    /// Stable type name; half of the local cache's primary key.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::UnitConversions => "unit_conversions",
            Collection::Ingredients => "ingredients",
            Collection::Recipes => "recipes",
            Collection::Entrees => "entrees",
            Collection::ImportMaps => "import_maps",
            Collection::Restaurants => "restaurants",
        }
    }

    /// True for collections partitioned by restaurant id. Unit conversions,
    /// import maps, and the restaurant list itself are global.
    pub fn is_scoped(&self) -> bool {
        matches!(
            self,
            Collection::Ingredients | Collection::Recipes | Collection::Entrees
        )
    }
}
