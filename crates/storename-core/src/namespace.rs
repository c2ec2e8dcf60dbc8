//! Identifier namespaces.
//!
//! Physical names only have to be unique inside one namespace. Table, key,
//! foreign-key and index names are global to the model; column names are
//! scoped to the table that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scope within which physical identifiers must be distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Namespace {
    /// Table names
    Table,
    /// Primary key constraint names
    Key,
    /// Foreign key constraint names
    ForeignKey,
    /// Index names
    Index,
    /// Column names of one table, keyed by that table's physical name
    Column { table: String },
}

impl Namespace {
    /// Column namespace for the given table.
    pub fn column(table: impl Into<String>) -> Self {
        Namespace::Column {
            table: table.into(),
        }
    }

    /// Whether this namespace spans the whole model.
    pub const fn is_global(&self) -> bool {
        !matches!(self, Namespace::Column { .. })
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Table => write!(f, "tables"),
            Namespace::Key => write!(f, "keys"),
            Namespace::ForeignKey => write!(f, "foreign keys"),
            Namespace::Index => write!(f, "indexes"),
            Namespace::Column { table } => write!(f, "columns of '{}'", table),
        }
    }
}
