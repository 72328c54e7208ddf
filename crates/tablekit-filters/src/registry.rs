//! The filter registry.
//!
//! [`FilterRegistry`] maps a table identifier to the ordered list of filter
//! definitions for that table. It is built once (in code or from a YAML/JSON
//! document) and never mutated afterwards, so a single instance can be shared
//! behind an `Arc` by every table on every thread.
//!
//! # File format
//!
//! Both YAML and JSON documents are a map from table id to a list of
//! definitions:
//!
//! ```yaml
//! projects:
//!   - columnKey: status
//!     label: Status
//!     filterType: select
//!     staticOptions:
//!       - { value: active, label: Active }
//!   - columnKey: createdOn
//!     label: Created
//!     filterType: daterange
//! ```
//!
//! Lookups never fail: an unknown table simply has no filters.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::definition::FilterDefinition;
use crate::error::{FilterError, Result};

/// Recognized registry file extensions.
pub const REGISTRY_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".json"];

/// Immutable lookup from table id to filter definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRegistry {
    tables: BTreeMap<String, Vec<FilterDefinition>>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a registry in code.
    pub fn builder() -> FilterRegistryBuilder {
        FilterRegistryBuilder::default()
    }

    /// Parses a registry from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a table lists the same
    /// column key twice.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let tables: BTreeMap<String, Vec<FilterDefinition>> = serde_yaml::from_str(yaml)?;
        Self::from_tables(tables)
    }

    /// Parses a registry from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a table lists the same
    /// column key twice.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: BTreeMap<String, Vec<FilterDefinition>> = serde_json::from_str(json)?;
        Self::from_tables(tables)
    }

    /// Loads a registry file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an extension other
    /// than those in [`REGISTRY_EXTENSIONS`], or fails to parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .filter(|e| REGISTRY_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| FilterError::UnsupportedExtension(path.to_path_buf()))?;

        let content = std::fs::read_to_string(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = if ext == ".json" {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        tracing::debug!(
            path = %path.display(),
            tables = registry.tables.len(),
            "Loaded filter registry"
        );
        Ok(registry)
    }

    fn from_tables(tables: BTreeMap<String, Vec<FilterDefinition>>) -> Result<Self> {
        for (table, defs) in &tables {
            check_unique(table, defs)?;
        }
        Ok(FilterRegistry { tables })
    }

    /// Returns the filter definitions of a table, in configured order.
    ///
    /// Unknown tables yield an empty slice.
    pub fn get_filters(&self, table_id: &str) -> &[FilterDefinition] {
        self.tables.get(table_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if the table has at least one filter definition.
    pub fn has_filters(&self, table_id: &str) -> bool {
        !self.get_filters(table_id).is_empty()
    }

    /// Returns the definition of one column, if configured.
    pub fn get_filter(&self, table_id: &str, column_key: &str) -> Option<&FilterDefinition> {
        self.get_filters(table_id)
            .iter()
            .find(|def| def.column_key == column_key)
    }

    /// Iterates over the configured table ids in sorted order.
    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the number of configured tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no table is configured.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn check_unique(table: &str, defs: &[FilterDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for def in defs {
        if !seen.insert(def.column_key.as_str()) {
            return Err(FilterError::DuplicateColumn {
                table: table.to_string(),
                column: def.column_key.clone(),
            });
        }
    }
    Ok(())
}

/// Builder for [`FilterRegistry`].
#[derive(Debug, Default)]
pub struct FilterRegistryBuilder {
    tables: BTreeMap<String, Vec<FilterDefinition>>,
}

impl FilterRegistryBuilder {
    /// Adds (or replaces) a table's definitions.
    pub fn table(mut self, table_id: impl Into<String>, defs: Vec<FilterDefinition>) -> Self {
        self.tables.insert(table_id.into(), defs);
        self
    }

    /// Appends one definition to a table.
    pub fn filter(mut self, table_id: impl Into<String>, def: FilterDefinition) -> Self {
        self.tables.entry(table_id.into()).or_default().push(def);
        self
    }

    /// Finalizes the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a table lists the same column key twice.
    pub fn build(self) -> Result<FilterRegistry> {
        FilterRegistry::from_tables(self.tables)
    }
}
