//! Error types for identifier resolution and model building.

use std::fmt;

use crate::namespace::Namespace;

/// The primary error type for all storename operations.
#[derive(Debug)]
pub enum Error {
    /// Configuration errors (max length too small, invalid marker, unparsable config)
    Config(ConfigError),
    /// A physical name is already held by another logical name or another owner
    NamespaceCollision(CollisionError),
    /// Invalid model declaration
    Schema(SchemaError),
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

/// A declaration whose physical name is already taken in its namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionError {
    /// Namespace in which the collision happened
    pub namespace: Namespace,
    /// The logical name that could not be placed
    pub logical: String,
    /// The physical name both logical names map to
    pub physical: String,
    /// The logical name that already owns `physical`
    pub existing_logical: String,
    /// Model object that made the failing declaration
    pub owner: Option<String>,
    /// Model object that already holds `physical`
    pub existing_owner: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// Two entities declared with the same name
    DuplicateEntity,
    /// A logical name (entity, table, column, key, index) is empty
    EmptyName,
    /// A key or index references a property the entity does not declare
    UnknownColumn,
    /// A foreign key references an entity that is not part of the model
    UnknownEntity,
    /// A key or index has no columns
    EmptyColumns,
    /// Foreign key columns do not line up with the principal key
    KeyMismatch,
    /// An entity declares a property twice or maps two properties to one column
    DuplicateColumn,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Error {
    /// Resolution is a pure function of its input, so no error is ever retryable.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Is this a configuration error?
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// The schema error kind, if this is a schema error.
    pub fn schema_kind(&self) -> Option<SchemaErrorKind> {
        match self {
            Error::Schema(e) => Some(e.kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::NamespaceCollision(e) => write!(f, "Namespace collision: {}", e),
            Error::Schema(e) => write!(f, "Schema error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for CollisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' in {} is already used by '{}'",
            self.physical, self.namespace, self.existing_logical
        )?;
        if let Some(existing_owner) = &self.existing_owner {
            write!(f, " of {}", existing_owner)?;
        }
        if self.logical != self.physical {
            write!(f, " (declared as '{}')", self.logical)?;
        }
        if let Some(owner) = &self.owner {
            write!(f, ", requested by {}", owner)?;
        }
        Ok(())
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<CollisionError> for Error {
    fn from(err: CollisionError) -> Self {
        Error::NamespaceCollision(err)
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

/// Result type alias for storename operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_prefixes_by_variant() {
        let err = Error::from(ConfigError::new("max_length 2 is below the minimum of 3"));
        assert_eq!(
            err.to_string(),
            "Configuration error: max_length 2 is below the minimum of 3"
        );

        let err = Error::from(SchemaError::new(
            SchemaErrorKind::UnknownEntity,
            "foreign key on 'Order' references unknown entity 'Customer'",
        ));
        assert_eq!(
            err.to_string(),
            "Schema error: foreign key on 'Order' references unknown entity 'Customer'"
        );
        assert_eq!(err.schema_kind(), Some(SchemaErrorKind::UnknownEntity));
    }

    #[test]
    fn collision_mentions_both_owners() {
        let err = Error::from(CollisionError {
            namespace: Namespace::Table,
            logical: "Orders~".to_string(),
            physical: "Orders~".to_string(),
            existing_logical: "OrdersWithAVeryLongName".to_string(),
            owner: None,
            existing_owner: None,
        });
        let msg = err.to_string();
        assert!(msg.contains("'Orders~' in tables"));
        assert!(msg.contains("'OrdersWithAVeryLongName'"));
        assert!(!msg.contains("declared as"));
        assert!(!msg.contains("requested by"));
    }

    #[test]
    fn collision_names_owners_when_known() {
        let err = CollisionError {
            namespace: Namespace::Key,
            logical: "PK_X".to_string(),
            physical: "PK_X".to_string(),
            existing_logical: "PK_X".to_string(),
            owner: Some("primary key of 'B'".to_string()),
            existing_owner: Some("primary key of 'A'".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "'PK_X' in keys is already used by 'PK_X' of primary key of 'A', \
             requested by primary key of 'B'"
        );
    }

    #[test]
    fn config_error_exposes_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Config(ConfigError {
            message: "invalid resolver config".to_string(),
            source: Some(Box::new(parse_err)),
        });
        assert!(err.source().is_some());
        assert!(err.is_config_error());
        assert!(!err.is_retryable());
    }
}
