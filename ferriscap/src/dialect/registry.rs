//! Global dialect registry for looking up dialect definitions.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::definition::Dialect;
use super::vendors;
use crate::error::{DialectError, Result};

/// Global dialect registry.
static REGISTRY: Lazy<RwLock<DialectRegistry>> = Lazy::new(|| {
    let mut registry = DialectRegistry::new();
    registry.register_builtin_dialects();
    RwLock::new(registry)
});

/// Registry for dialect definitions.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Dialect>,
}

impl DialectRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<DialectRegistry> {
        &REGISTRY
    }

    /// Look up a built-in or registered dialect by name in the global registry.
    pub fn lookup(name: &str) -> Result<Dialect> {
        let registry = REGISTRY.read().map_err(|_| DialectError::UnknownDialect {
            name: name.to_string(),
        })?;
        registry.get(name).cloned().ok_or_else(|| {
            DialectError::UnknownDialect {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Register built-in dialects.
    fn register_builtin_dialects(&mut self) {
        self.dialects.insert(
            vendors::huawei_vrp::DIALECT_NAME.to_string(),
            vendors::huawei_vrp::dialect(),
        );
    }

    /// Register a dialect definition.
    pub fn register(&mut self, dialect: Dialect) -> Result<()> {
        if self.dialects.contains_key(&dialect.name) {
            return Err(DialectError::AlreadyRegistered {
                name: dialect.name.clone(),
            }
            .into());
        }
        self.dialects.insert(dialect.name.clone(), dialect);
        Ok(())
    }

    /// Get a dialect by name.
    pub fn get(&self, name: &str) -> Option<&Dialect> {
        self.dialects.get(name)
    }

    /// Check if a dialect is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    /// List all registered dialect names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.dialects.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_builtin() {
        let dialect = DialectRegistry::lookup("huawei_vrp").unwrap();
        assert_eq!(dialect.name, "huawei_vrp");
    }

    #[test]
    fn test_lookup_unknown() {
        let err = DialectRegistry::lookup("cisco_ios").unwrap_err();
        assert!(err.to_string().contains("cisco_ios"));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = DialectRegistry::new();
        registry.register(Dialect::new("lab")).unwrap();
        assert!(registry.contains("lab"));
        assert!(registry.register(Dialect::new("lab")).is_err());
    }
}
