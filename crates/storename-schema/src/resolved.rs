//! The resolved model.
//!
//! Produced once by [`ModelBuilder::build`](crate::ModelBuilder::build) and
//! read-only afterwards. Every name here is a physical name.

use std::collections::HashMap;

use serde::Serialize;
use storename_core::{ResolvedNames, ResolverConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    /// Property name on the entity
    pub property: String,
    /// Physical column name
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKey {
    /// Physical constraint name
    pub name: String,
    /// Physical key column names
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedForeignKey {
    /// Physical constraint name
    pub name: String,
    /// Physical dependent column names
    pub columns: Vec<String>,
    /// Principal entity name
    pub principal: String,
    /// Physical principal table name
    pub principal_table: String,
    /// Physical principal key column names
    pub principal_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIndex {
    /// Physical index name
    pub name: String,
    /// Physical indexed column names
    pub columns: Vec<String>,
    pub unique: bool,
    /// Created to cover a foreign key rather than declared
    pub implicit: bool,
}

/// One entity with all of its identifiers resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntity {
    pub(crate) name: String,
    pub(crate) table: String,
    pub(crate) columns: Vec<ResolvedColumn>,
    pub(crate) primary_key: Option<ResolvedKey>,
    pub(crate) foreign_keys: Vec<ResolvedForeignKey>,
    pub(crate) indexes: Vec<ResolvedIndex>,
}

impl ResolvedEntity {
    /// Entity type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    /// Physical column name for a property.
    pub fn column_name(&self, property: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.property == property)
            .map(|c| c.name.as_str())
    }

    pub fn primary_key(&self) -> Option<&ResolvedKey> {
        self.primary_key.as_ref()
    }

    pub fn foreign_keys(&self) -> &[ResolvedForeignKey] {
        &self.foreign_keys
    }

    /// Declared indexes followed by implicit foreign key indexes.
    pub fn indexes(&self) -> &[ResolvedIndex] {
        &self.indexes
    }
}

/// All entities of a model with resolved identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    config: ResolverConfig,
    entities: Vec<ResolvedEntity>,
    by_name: HashMap<String, usize>,
    names: ResolvedNames,
}

impl ResolvedModel {
    pub(crate) fn new(
        config: ResolverConfig,
        entities: Vec<ResolvedEntity>,
        names: ResolvedNames,
    ) -> Self {
        let by_name = entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.clone(), idx))
            .collect();
        Self {
            config,
            entities,
            by_name,
            names,
        }
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&ResolvedEntity> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> &[ResolvedEntity] {
        &self.entities
    }

    /// Every identifier resolved for this model.
    pub fn names(&self) -> &ResolvedNames {
        &self.names
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Stable JSON document of the resolved schema names.
    ///
    /// Entities and identifiers appear in declaration order, so two builds
    /// of the same model produce identical snapshots.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "max_length": self.config.max_length,
            "marker": self.config.marker,
            "entities": self.entities,
            "identifiers": self.names.iter().collect::<Vec<_>>(),
        })
    }
}
