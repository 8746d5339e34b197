//! Product configuration registry.
//!
//! Holds named [`ProductConfig`]s behind a lock so a single manager can be
//! shared across threads. The standard presets are registered read-only on
//! construction; further products come from code or from JSON/TOML
//! documents of the form
//!
//! ```toml
//! [[products]]
//! name = "BRANCH.A"
//! annual_interest_rate = 7.5
//! days_in_year = "days360"
//! days_in_month = "days30"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::product::ProductConfig;

/// Serialized collection of products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    /// Products in document order.
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// Thread-safe registry of loan products.
///
/// # Example
///
/// ```rust
/// use progressive_config::{ProductConfig, ProductConfigManager};
///
/// let manager = ProductConfigManager::new();
/// let monthly = manager.get("MONTHLY.360.30").unwrap();
/// assert!(monthly.read_only);
///
/// let branch = ProductConfig::monthly_360_30().with_name("BRANCH.A");
/// manager.register(branch).unwrap();
/// assert!(manager.get("BRANCH.A").is_ok());
/// ```
pub struct ProductConfigManager {
    products: RwLock<HashMap<String, ProductConfig>>,
}

impl Default for ProductConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductConfigManager {
    /// Creates a manager holding the standard presets.
    pub fn new() -> Self {
        let manager = Self::empty();
        manager.load_standard_configs();
        manager
    }

    /// Creates a manager with no products.
    pub fn empty() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }

    fn load_standard_configs(&self) {
        let _ = self.register(ProductConfig::monthly_360_30());
        let _ = self.register(ProductConfig::monthly_actual());
        let _ = self.register(ProductConfig::weekly_365());
        let _ = self.register(ProductConfig::daily_365());
    }

    /// Registers a product, replacing any writable product of the same name.
    pub fn register(&self, config: ProductConfig) -> ConfigResult<()> {
        config.validate_or_error()?;

        let mut products = self
            .products
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        if let Some(existing) = products.get(&config.name) {
            if existing.read_only {
                return Err(ConfigError::ReadOnly {
                    key: config.name.clone(),
                });
            }
        }

        debug!(product = %config.name, "product registered");
        products.insert(config.name.clone(), config);
        Ok(())
    }

    /// Gets a product by name.
    pub fn get(&self, name: &str) -> ConfigResult<ProductConfig> {
        let products = self
            .products
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        products.get(name).cloned().ok_or_else(|| ConfigError::NotFound {
            key: name.to_string(),
        })
    }

    /// Removes a writable product. Returns false if it was not registered.
    pub fn remove(&self, name: &str) -> ConfigResult<bool> {
        let mut products = self
            .products
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        if let Some(config) = products.get(name) {
            if config.read_only {
                return Err(ConfigError::ReadOnly {
                    key: name.to_string(),
                });
            }
        }

        let removed = products.remove(name).is_some();
        if removed {
            debug!(product = %name, "product removed");
        }
        Ok(removed)
    }

    /// Lists product names in sorted order.
    pub fn list(&self) -> ConfigResult<Vec<String>> {
        let products = self
            .products
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        let mut names: Vec<_> = products.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    // =========================================================================
    // LOADING AND EXPORT
    // =========================================================================

    /// Registers every product of a JSON catalog. Returns the names loaded.
    pub fn load_json(&self, json: &str) -> ConfigResult<Vec<String>> {
        let catalog: ProductCatalog = serde_json::from_str(json)?;
        self.load_catalog(catalog)
    }

    /// Registers every product of a TOML catalog. Returns the names loaded.
    pub fn load_toml(&self, toml: &str) -> ConfigResult<Vec<String>> {
        let catalog: ProductCatalog = toml::from_str(toml)?;
        self.load_catalog(catalog)
    }

    /// Loads a `.json` or `.toml` catalog file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<Vec<String>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if extension != "json" && extension != "toml" {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let names = if extension == "json" {
            self.load_json(&contents)?
        } else {
            self.load_toml(&contents)?
        };
        info!(path = %path.display(), products = names.len(), "product catalog loaded");
        Ok(names)
    }

    /// Validates the whole catalog before registering any of it.
    fn load_catalog(&self, catalog: ProductCatalog) -> ConfigResult<Vec<String>> {
        for config in &catalog.products {
            config.validate_or_error()?;
        }
        let mut names = Vec::with_capacity(catalog.products.len());
        for config in catalog.products {
            names.push(config.name.clone());
            self.register(config)?;
        }
        Ok(names)
    }

    /// Snapshot of every registered product, sorted by name.
    pub fn catalog(&self) -> ConfigResult<ProductCatalog> {
        let products = self
            .products
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;

        let mut products: Vec<_> = products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ProductCatalog { products })
    }

    /// Serializes every registered product as a JSON catalog.
    pub fn export_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.catalog()?)?)
    }

    /// Serializes every registered product as a TOML catalog.
    pub fn export_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string(&self.catalog()?)?)
    }
}
