//! Model build pass.
//!
//! Collects entity declarations and resolves every identifier they imply in
//! one deterministic pass:
//!
//! 1. table names, in entity declaration order
//! 2. column names of every entity, scoped to the entity's physical table
//! 3. per entity, in declaration order: primary key, foreign keys, then
//!    indexes (declared ones first, implicit foreign key indexes after)

use std::collections::{HashMap, HashSet};

use storename_core::{
    Error, IdentifierResolver, Namespace, ResolverConfig, Result, SchemaError, SchemaErrorKind,
};

use crate::conventions;
use crate::model::EntityDecl;
use crate::resolved::{
    ResolvedColumn, ResolvedEntity, ResolvedForeignKey, ResolvedIndex, ResolvedKey, ResolvedModel,
};

/// Builder for a resolved model.
///
/// # Example
///
/// ```
/// use storename_core::ResolverConfig;
/// use storename_schema::{EntityDecl, ForeignKeyDecl, ModelBuilder};
///
/// let model = ModelBuilder::new(ResolverConfig::default())
///     .entity(EntityDecl::new("Customers").column("Id").primary_key(["Id"]))
///     .entity(
///         EntityDecl::new("Orders")
///             .column("Id")
///             .column("CustomerId")
///             .primary_key(["Id"])
///             .foreign_key(ForeignKeyDecl::new("Customers", ["CustomerId"])),
///     )
///     .build()
///     .unwrap();
///
/// let orders = model.entity("Orders").unwrap();
/// assert_eq!(orders.primary_key().unwrap().name, "PK_Orders");
/// assert_eq!(orders.foreign_keys()[0].name, "FK_Orders_Customers_CustomerId");
/// assert_eq!(orders.indexes()[0].name, "IX_Orders_CustomerId");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    config: ResolverConfig,
    entities: Vec<EntityDecl>,
}

impl ModelBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
        }
    }

    /// Add an entity. Declaration order is resolution order.
    pub fn entity(mut self, entity: EntityDecl) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add several entities in order.
    pub fn entities(mut self, entities: impl IntoIterator<Item = EntityDecl>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Validate the declarations and resolve all identifiers.
    #[tracing::instrument(level = "debug", skip(self), fields(entities = self.entities.len()))]
    pub fn build(&self) -> Result<ResolvedModel> {
        let resolver = IdentifierResolver::new(self.config)?;
        let by_name = self.validate()?;
        let mut pass = resolver.begin();

        let mut tables = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let owner = format!("entity '{}'", entity.name);
            tables.push(pass.declare_for(Namespace::Table, entity.table_name(), owner)?);
        }

        let mut columns = Vec::with_capacity(self.entities.len());
        for (entity, table) in self.entities.iter().zip(&tables) {
            let namespace = Namespace::column(table.clone());
            let mut resolved = Vec::with_capacity(entity.columns.len());
            for column in &entity.columns {
                let owner = format!("property '{}' of '{}'", column.property, entity.name);
                resolved.push(ResolvedColumn {
                    property: column.property.clone(),
                    name: pass.declare_for(namespace.clone(), column.column.clone(), owner)?,
                });
            }
            columns.push(resolved);
        }

        let mut entities = Vec::with_capacity(self.entities.len());
        for (idx, entity) in self.entities.iter().enumerate() {
            let table = entity.table_name();

            let primary_key = match &entity.primary_key {
                Some(key) => {
                    let logical = key
                        .name
                        .clone()
                        .unwrap_or_else(|| conventions::key_name(table));
                    let owner = format!("primary key of '{}'", entity.name);
                    Some(ResolvedKey {
                        name: pass.declare_for(Namespace::Key, logical, owner)?,
                        columns: physical_columns(&columns[idx], &key.properties),
                    })
                }
                None => None,
            };

            let mut foreign_keys = Vec::with_capacity(entity.foreign_keys.len());
            for (n, fk) in entity.foreign_keys.iter().enumerate() {
                let principal_idx = by_name[fk.principal.as_str()];
                let principal = &self.entities[principal_idx];
                let logical = fk.name.clone().unwrap_or_else(|| {
                    conventions::foreign_key_name(
                        table,
                        principal.table_name(),
                        &logical_columns(entity, &fk.properties),
                    )
                });
                let principal_columns = principal
                    .primary_key
                    .as_ref()
                    .map(|k| physical_columns(&columns[principal_idx], &k.properties))
                    .unwrap_or_default();
                let owner = format!("foreign key {} of '{}'", n + 1, entity.name);
                foreign_keys.push(ResolvedForeignKey {
                    name: pass.declare_for(Namespace::ForeignKey, logical, owner)?,
                    columns: physical_columns(&columns[idx], &fk.properties),
                    principal: principal.name.clone(),
                    principal_table: tables[principal_idx].clone(),
                    principal_columns,
                });
            }

            let mut indexes = Vec::with_capacity(entity.indexes.len());
            for (n, index) in entity.indexes.iter().enumerate() {
                let logical = index.name.clone().unwrap_or_else(|| {
                    conventions::index_name(table, &logical_columns(entity, &index.properties))
                });
                let owner = format!("index {} of '{}'", n + 1, entity.name);
                indexes.push(ResolvedIndex {
                    name: pass.declare_for(Namespace::Index, logical, owner)?,
                    columns: physical_columns(&columns[idx], &index.properties),
                    unique: index.unique,
                    implicit: false,
                });
            }

            let mut covered: Vec<&[String]> = entity
                .indexes
                .iter()
                .map(|i| i.properties.as_slice())
                .chain(entity.primary_key.iter().map(|k| k.properties.as_slice()))
                .collect();
            for (n, fk) in entity.foreign_keys.iter().enumerate() {
                if covered.iter().any(|c| c.starts_with(&fk.properties)) {
                    continue;
                }
                covered.push(&fk.properties);
                let logical =
                    conventions::index_name(table, &logical_columns(entity, &fk.properties));
                let owner = format!("index for foreign key {} of '{}'", n + 1, entity.name);
                indexes.push(ResolvedIndex {
                    name: pass.declare_for(Namespace::Index, logical, owner)?,
                    columns: physical_columns(&columns[idx], &fk.properties),
                    unique: false,
                    implicit: true,
                });
            }

            entities.push(ResolvedEntity {
                name: entity.name.clone(),
                table: tables[idx].clone(),
                columns: columns[idx].clone(),
                primary_key,
                foreign_keys,
                indexes,
            });
        }

        let names = pass.finish();
        tracing::info!(
            entities = entities.len(),
            identifiers = names.len(),
            truncated = names.iter().filter(|n| n.truncated).count(),
            "Model identifiers resolved"
        );
        Ok(ResolvedModel::new(self.config, entities, names))
    }

    /// Check declarations and index entities by name.
    fn validate(&self) -> Result<HashMap<&str, usize>> {
        let mut by_name = HashMap::with_capacity(self.entities.len());
        for (idx, entity) in self.entities.iter().enumerate() {
            if entity.name.is_empty() {
                return Err(schema_error(SchemaErrorKind::EmptyName, "entity name is empty"));
            }
            if by_name.insert(entity.name.as_str(), idx).is_some() {
                return Err(schema_error(
                    SchemaErrorKind::DuplicateEntity,
                    format!("entity '{}' is declared more than once", entity.name),
                ));
            }
        }

        for entity in &self.entities {
            validate_entity(entity)?;

            for fk in &entity.foreign_keys {
                let Some(&principal_idx) = by_name.get(fk.principal.as_str()) else {
                    return Err(schema_error(
                        SchemaErrorKind::UnknownEntity,
                        format!(
                            "foreign key on '{}' references unknown entity '{}'",
                            entity.name, fk.principal
                        ),
                    ));
                };
                let principal = &self.entities[principal_idx];
                let key_len = principal
                    .primary_key
                    .as_ref()
                    .map_or(0, |k| k.properties.len());
                if key_len != fk.properties.len() {
                    return Err(schema_error(
                        SchemaErrorKind::KeyMismatch,
                        format!(
                            "foreign key on '{}' has {} column(s) but the key of '{}' has {}",
                            entity.name,
                            fk.properties.len(),
                            principal.name,
                            key_len
                        ),
                    ));
                }
            }
        }

        Ok(by_name)
    }
}

fn validate_entity(entity: &EntityDecl) -> Result<()> {
    if entity.table_name().is_empty() {
        return Err(schema_error(
            SchemaErrorKind::EmptyName,
            format!("entity '{}' has an empty table name", entity.name),
        ));
    }
    if entity
        .columns
        .iter()
        .any(|c| c.property.is_empty() || c.column.is_empty())
    {
        return Err(schema_error(
            SchemaErrorKind::EmptyName,
            format!("entity '{}' has a column with an empty name", entity.name),
        ));
    }

    let mut seen_properties = HashSet::with_capacity(entity.columns.len());
    let mut seen_columns = HashSet::with_capacity(entity.columns.len());
    for column in &entity.columns {
        if !seen_properties.insert(column.property.as_str()) {
            return Err(schema_error(
                SchemaErrorKind::DuplicateColumn,
                format!(
                    "entity '{}' declares property '{}' more than once",
                    entity.name, column.property
                ),
            ));
        }
        if !seen_columns.insert(column.column.as_str()) {
            return Err(schema_error(
                SchemaErrorKind::DuplicateColumn,
                format!(
                    "entity '{}' maps more than one property to column '{}'",
                    entity.name, column.column
                ),
            ));
        }
    }

    let explicit_names = entity
        .primary_key
        .iter()
        .filter_map(|k| k.name.as_deref())
        .chain(entity.foreign_keys.iter().filter_map(|f| f.name.as_deref()))
        .chain(entity.indexes.iter().filter_map(|i| i.name.as_deref()));
    for name in explicit_names {
        if name.is_empty() {
            return Err(schema_error(
                SchemaErrorKind::EmptyName,
                format!("entity '{}' declares an empty constraint name", entity.name),
            ));
        }
    }

    let properties: HashSet<&str> = entity.columns.iter().map(|c| c.property.as_str()).collect();
    let mut column_lists: Vec<(&str, &[String])> = Vec::new();
    if let Some(key) = &entity.primary_key {
        column_lists.push(("primary key", key.properties.as_slice()));
    }
    for fk in &entity.foreign_keys {
        column_lists.push(("foreign key", fk.properties.as_slice()));
    }
    for index in &entity.indexes {
        column_lists.push(("index", index.properties.as_slice()));
    }

    for (what, list) in column_lists {
        if list.is_empty() {
            return Err(schema_error(
                SchemaErrorKind::EmptyColumns,
                format!("{what} on '{}' has no columns", entity.name),
            ));
        }
        if let Some(missing) = list.iter().find(|p| !properties.contains(p.as_str())) {
            return Err(schema_error(
                SchemaErrorKind::UnknownColumn,
                format!(
                    "{what} on '{}' references unknown property '{}'",
                    entity.name, missing
                ),
            ));
        }
    }
    Ok(())
}

fn schema_error(kind: SchemaErrorKind, message: impl Into<String>) -> Error {
    Error::Schema(SchemaError::new(kind, message))
}

/// Logical column names for a validated property list.
fn logical_columns<'a>(entity: &'a EntityDecl, properties: &[String]) -> Vec<&'a str> {
    properties
        .iter()
        .filter_map(|p| entity.find_column(p).map(|c| c.column.as_str()))
        .collect()
}

/// Physical column names for a validated property list.
fn physical_columns(columns: &[ResolvedColumn], properties: &[String]) -> Vec<String> {
    properties
        .iter()
        .filter_map(|p| columns.iter().find(|c| &c.property == p).map(|c| c.name.clone()))
        .collect()
}
