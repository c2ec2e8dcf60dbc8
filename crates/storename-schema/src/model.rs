//! Entity declarations.
//!
//! Declarations are plain data collected through builder methods. Nothing
//! is resolved here; [`ModelBuilder`](crate::ModelBuilder) walks them in
//! declaration order and hands every logical name to the resolver.

/// A mapped property and its proposed column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDecl {
    /// Property name on the entity
    pub property: String,
    /// Proposed column name (defaults to the property name)
    pub column: String,
}

/// Primary key declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDecl {
    /// Key properties, in key order
    pub properties: Vec<String>,
    /// Explicit constraint name
    pub name: Option<String>,
}

/// Foreign key declaration on the dependent entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDecl {
    /// Name of the principal entity
    pub principal: String,
    /// Dependent properties, matched positionally to the principal's key
    pub properties: Vec<String>,
    /// Explicit constraint name
    pub name: Option<String>,
}

impl ForeignKeyDecl {
    pub fn new<I, S>(principal: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            principal: principal.into(),
            properties: properties.into_iter().map(Into::into).collect(),
            name: None,
        }
    }

    /// Set an explicit constraint name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDecl {
    /// Indexed properties, in index order
    pub properties: Vec<String>,
    /// Whether the index enforces uniqueness
    pub unique: bool,
    /// Explicit index name
    pub name: Option<String>,
}

impl IndexDecl {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
            unique: false,
            name: None,
        }
    }

    /// Mark the index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set an explicit index name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An entity type mapped to one table.
///
/// # Example
///
/// ```
/// use storename_schema::{EntityDecl, ForeignKeyDecl, IndexDecl};
///
/// let order = EntityDecl::new("Order")
///     .table("Orders")
///     .column("Id")
///     .column_named("CustomerId", "customer_id")
///     .primary_key(["Id"])
///     .foreign_key(ForeignKeyDecl::new("Customer", ["CustomerId"]))
///     .index(IndexDecl::new(["CustomerId"]).name("IX_Orders_Customer"));
///
/// assert_eq!(order.table_name(), "Orders");
/// assert_eq!(order.find_column("CustomerId").unwrap().column, "customer_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDecl {
    /// Entity type name
    pub name: String,
    /// Explicit table name
    pub table: Option<String>,
    /// Columns in declaration order
    pub columns: Vec<ColumnDecl>,
    pub primary_key: Option<KeyDecl>,
    pub foreign_keys: Vec<ForeignKeyDecl>,
    pub indexes: Vec<IndexDecl>,
}

impl EntityDecl {
    /// Declare an entity; its table name defaults to the entity name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Set an explicit table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a column named after its property.
    pub fn column(self, property: impl Into<String>) -> Self {
        let property = property.into();
        let column = property.clone();
        self.column_named(property, column)
    }

    /// Add a column with an explicit column name.
    pub fn column_named(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.push(ColumnDecl {
            property: property.into(),
            column: column.into(),
        });
        self
    }

    /// Set the primary key properties.
    pub fn primary_key<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = self.primary_key.take().and_then(|k| k.name);
        self.primary_key = Some(KeyDecl {
            properties: properties.into_iter().map(Into::into).collect(),
            name,
        });
        self
    }

    /// Set an explicit primary key constraint name.
    ///
    /// Has no effect until [`primary_key`](Self::primary_key) is declared,
    /// in either order.
    pub fn key_name(mut self, name: impl Into<String>) -> Self {
        let key = self.primary_key.get_or_insert_with(|| KeyDecl {
            properties: Vec::new(),
            name: None,
        });
        key.name = Some(name.into());
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKeyDecl) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn index(mut self, index: IndexDecl) -> Self {
        self.indexes.push(index);
        self
    }

    /// The logical table name.
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Find a column by property name.
    pub fn find_column(&self, property: &str) -> Option<&ColumnDecl> {
        self.columns.iter().find(|c| c.property == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_defaults_to_entity_name() {
        let entity = EntityDecl::new("Customer");
        assert_eq!(entity.table_name(), "Customer");
        assert_eq!(entity.clone().table("Customers").table_name(), "Customers");
    }

    #[test]
    fn key_name_survives_either_order() {
        let a = EntityDecl::new("A").key_name("PK_Custom").primary_key(["Id"]);
        let b = EntityDecl::new("A").primary_key(["Id"]).key_name("PK_Custom");
        assert_eq!(a.primary_key, b.primary_key);
        assert_eq!(a.primary_key.unwrap().name.as_deref(), Some("PK_Custom"));
    }

    #[test]
    fn column_defaults_to_property_name() {
        let entity = EntityDecl::new("A").column("Id").column_named("Name", "display_name");
        assert_eq!(entity.find_column("Id").unwrap().column, "Id");
        assert_eq!(entity.find_column("Name").unwrap().column, "display_name");
        assert!(entity.find_column("Missing").is_none());
    }
}
