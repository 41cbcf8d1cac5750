use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{default_categories, Category};
use crate::errors::{ConclaveError, ConclaveResult, ConfigError};

/// Static lookup of every prediction category, keyed by `category_id`.
///
/// Built once at startup and shared read-only (`Arc<CategoryRegistry>`).
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: BTreeMap<String, Category>,
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build a registry from definitions. Duplicate ids and inconsistent
    /// definitions are configuration errors.
    pub fn from_categories(categories: Vec<Category>) -> ConclaveResult<Self> {
        let mut map = BTreeMap::new();
        for category in categories {
            if let Err(e) = category.check_definition() {
                warn!(category_id = %category.category_id, error = %e, "category definition rejected");
                return Err(e.into());
            }
            let id = category.category_id.clone();
            if map.insert(id.clone(), category).is_some() {
                warn!(category_id = %id, "duplicate category id rejected");
                return Err(ConfigError::ValidationFailed {
                    field: format!("categories.{id}"),
                    message: "duplicate category id".to_string(),
                }
                .into());
            }
        }
        debug!(categories = map.len(), "category registry built");
        Ok(Self { categories: map })
    }

    /// The built-in category set.
    pub fn with_defaults() -> Self {
        let categories = default_categories()
            .into_iter()
            .map(|c| (c.category_id.clone(), c))
            .collect();
        Self { categories }
    }

    /// Parse `[[categories]]` tables from a TOML string.
    pub fn from_toml(toml_str: &str) -> ConclaveResult<Self> {
        let file: RegistryFile = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::from_categories(file.categories)
    }

    /// Load `[[categories]]` tables from a TOML file.
    pub fn load(path: &Path) -> ConclaveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file: RegistryFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_categories(file.categories)
    }

    pub fn get(&self, category_id: &str) -> Option<&Category> {
        self.categories.get(category_id)
    }

    /// Look up a category, failing with `UnknownCategory`.
    pub fn require(&self, category_id: &str) -> ConclaveResult<&Category> {
        self.get(category_id)
            .ok_or_else(|| ConclaveError::UnknownCategory(category_id.to_string()))
    }

    /// All categories in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Categories belonging to a group, in id order.
    pub fn by_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Category> + 'a {
        self.categories.values().filter(move |c| c.group == group)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
