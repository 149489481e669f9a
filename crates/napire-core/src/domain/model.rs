//! Model registry: the selectable models and their generic categories.

use std::collections::BTreeMap;

use napire_backend::ModelDefinition;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Category code → display label for categories sorted by description.
pub type GenericCategoryMap = BTreeMap<String, String>;

const BUNDLED_MODELS: &str = include_str!("../../data/models.json");

/// A selectable model together with its generic category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(rename = "model")]
    pub definition: ModelDefinition,
    #[serde(default)]
    pub generic_categories: GenericCategoryMap,
}

impl ModelEntry {
    pub fn is_generic(&self, category: &str) -> bool {
        self.generic_categories.contains_key(category)
    }
}

/// Model id → model entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelEntry>,
}

impl ModelRegistry {
    /// Registry shipped with the crate (`Cause analyzer`, `Trouble predictor`).
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_MODELS)
    }

    /// Parse a registry from a JSON object keyed by model id.
    pub fn from_json(json: &str) -> Result<Self> {
        let models: BTreeMap<String, ModelEntry> = serde_json::from_str(json)?;
        Ok(Self { models })
    }

    pub fn get(&self, id: &str) -> Option<&ModelEntry> {
        self.models.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
