use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::store::Collection;

/// A restaurant (tenant). Its id scopes ingredients, recipes, and entrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

impl Restaurant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
        }
    }
}

impl Record for Restaurant {
    const COLLECTION: Collection = Collection::Restaurants;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
