//! Configuration of enumeration registries.
//!
//! A [`RegistryConfig`] chooses the [`TypeCatalog`] a registry resolves
//! kinds from and the modules its scanner must never introspect. The
//! process-wide [`ENUMERATIONS`](crate::ENUMERATIONS) registry reads the
//! configuration installed with [`set_registry_config`] or
//! [`add_excluded_modules`] when it is first accessed; after that the
//! configuration is locked.
//!
//! # Config File Format
//!
//! With the `config-file` feature (enabled by default) a configuration can
//! be read from JSON:
//!
//! ```json
//! {
//!   "excluded_modules": ["core", "std"]
//! }
//! ```
//!
//! All fields are optional. The catalog cannot be set from a file.

use std::fmt;
#[cfg(feature = "config-file")]
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, const_mutex};
#[cfg(feature = "config-file")]
use serde::Deserialize;
use thiserror::Error;

use crate::TypeCatalog;

/// Configuration for an [`EnumerationRegistry`](crate::EnumerationRegistry).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use smart_enumerations::{EnumerationRegistry, RegistryConfig, StaticCatalog};
///
/// let config = RegistryConfig::new()
///     .with_excluded_modules(vec!["legacy".to_string()])
///     .with_catalog(Arc::new(StaticCatalog::new()));
/// assert_eq!(config.excluded_modules(), ["legacy".to_string()]);
///
/// let registry = EnumerationRegistry::with_config(config);
/// assert!(registry.resolve_kind_by_name("color").is_err());
/// ```
#[derive(Clone, Default)]
#[cfg_attr(feature = "config-file", derive(Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct RegistryConfig {
    /// Modules the scanner never introspects.
    excluded_modules: Vec<String>,
    /// Catalog to resolve kinds from; the inventory when unset.
    #[cfg_attr(feature = "config-file", serde(skip))]
    catalog: Option<Arc<dyn TypeCatalog>>,
}

impl RegistryConfig {
    /// Creates an empty configuration: inventory catalog, nothing excluded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded_modules(mut self, modules: Vec<String>) -> Self {
        self.excluded_modules = modules;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn TypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn excluded_modules(&self) -> &[String] {
        &self.excluded_modules
    }

    pub fn add_excluded_module(&mut self, module: String) {
        self.excluded_modules.push(module);
    }

    pub fn catalog(&self) -> Option<&Arc<dyn TypeCatalog>> {
        self.catalog.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Option<Arc<dyn TypeCatalog>>) {
        (self.excluded_modules, self.catalog)
    }

    /// Parses a configuration from JSON text.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|error| ConfigError::Json { file: None, error })
    }

    /// Reads a configuration from a JSON file.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|error| ConfigError::Json {
            file: Some(path.to_path_buf()),
            error,
        })
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("excluded_modules", &self.excluded_modules)
            .field("custom_catalog", &self.catalog.is_some())
            .finish()
    }
}

/// Errors from configuring a registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration was attempted after the global registry was initialized.
    #[error("cannot modify registry configuration after ENUMERATIONS has been accessed")]
    AlreadyInitialized,

    #[cfg(feature = "config-file")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error{}: {}", in_file(.file), .error)]
    Json {
        file: Option<PathBuf>,
        error: serde_json::Error,
    },
}

#[cfg(feature = "config-file")]
fn in_file(file: &Option<PathBuf>) -> String {
    file.as_ref()
        .map(|file| format!(" in {}", file.display()))
        .unwrap_or_default()
}

static CUSTOM_CONFIG: Mutex<Option<RegistryConfig>> = const_mutex(None);
static CONFIG_LOCKED: AtomicBool = AtomicBool::new(false);

/// Sets the configuration of the global registry.
///
/// Must be called before the first access to `ENUMERATIONS`; afterwards it
/// returns [`ConfigError::AlreadyInitialized`].
///
/// ```rust,ignore
/// use smart_enumerations::{set_registry_config, RegistryConfig};
///
/// set_registry_config(
///     RegistryConfig::new().with_excluded_modules(vec!["legacy".to_string()]),
/// )?;
/// ```
pub fn set_registry_config(config: RegistryConfig) -> Result<(), ConfigError> {
    if CONFIG_LOCKED.load(Ordering::SeqCst) {
        return Err(ConfigError::AlreadyInitialized);
    }
    *CUSTOM_CONFIG.lock() = Some(config);
    Ok(())
}

/// Adds modules the global registry's scanner must skip.
///
/// Must be called before the first access to `ENUMERATIONS`.
pub fn add_excluded_modules(modules: Vec<String>) -> Result<(), ConfigError> {
    if CONFIG_LOCKED.load(Ordering::SeqCst) {
        return Err(ConfigError::AlreadyInitialized);
    }
    let mut guard = CUSTOM_CONFIG.lock();
    let config = guard.get_or_insert_with(RegistryConfig::default);
    for module in modules {
        config.add_excluded_module(module);
    }
    Ok(())
}

/// Takes the global configuration and locks it against further changes.
pub(crate) fn get_and_lock_config() -> RegistryConfig {
    CONFIG_LOCKED.store(true, Ordering::SeqCst);
    CUSTOM_CONFIG.lock().take().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::new();
        assert!(config.excluded_modules().is_empty());
        assert!(config.catalog().is_none());
    }

    #[test]
    fn test_builder() {
        let mut config =
            RegistryConfig::new().with_excluded_modules(vec!["core".to_string()]);
        config.add_excluded_module("std".to_string());
        assert_eq!(config.excluded_modules(), ["core".to_string(), "std".to_string()]);

        let (excluded, catalog) = config.into_parts();
        assert_eq!(excluded.len(), 2);
        assert!(catalog.is_none());
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_parse_config_json() {
        let config =
            RegistryConfig::from_json_str(r#"{"excluded_modules": ["core", "std"]}"#).unwrap();
        assert_eq!(config.excluded_modules(), ["core".to_string(), "std".to_string()]);
        assert!(config.catalog().is_none());
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_parse_minimal_config() {
        let config = RegistryConfig::from_json_str("{}").unwrap();
        assert!(config.excluded_modules().is_empty());

        // unknown fields are tolerated
        let config = RegistryConfig::from_json_str(r#"{"comment": "none"}"#).unwrap();
        assert!(config.excluded_modules().is_empty());
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_invalid_config_json() {
        let error = RegistryConfig::from_json_str(r#"{"excluded_modules": 3}"#).unwrap_err();
        assert!(matches!(error, ConfigError::Json { file: None, .. }));
        assert!(error.to_string().starts_with("JSON parse error: "));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_missing_config_file() {
        let error =
            RegistryConfig::from_json_file(Path::new("/nonexistent/path/12345.json")).unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
