//! storename: length-bounded, unique store identifiers for ORM models.
//!
//! A model layer proposes logical names for tables, keys, foreign keys,
//! indexes and columns. Backends cap identifier length (128 characters on
//! SQL Server, 63 on PostgreSQL), so storename maps each logical name to a
//! physical one that:
//!
//! - fits the configured maximum length
//! - is unique within its namespace (columns are scoped per table)
//! - is derived deterministically from declaration order
//!
//! # Quick Start
//!
//! ```
//! use storename::prelude::*;
//!
//! let model = ModelBuilder::new(ResolverConfig::for_dialect(Dialect::Postgres))
//!     .entity(
//!         EntityDecl::new("CustomerLoyaltyProgramMembershipTierAssignmentHistoryEntry")
//!             .column("Id")
//!             .primary_key(["Id"]),
//!     )
//!     .entity(
//!         EntityDecl::new("CustomerLoyaltyProgramMembershipTierAssignmentHistoryEntryArchive")
//!             .column("Id")
//!             .primary_key(["Id"]),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let first = model
//!     .entity("CustomerLoyaltyProgramMembershipTierAssignmentHistoryEntry")
//!     .unwrap();
//! assert_eq!(first.table_name(), "CustomerLoyaltyProgramMembershipTierAssignmentHistoryEntry");
//!
//! let archive = model
//!     .entity("CustomerLoyaltyProgramMembershipTierAssignmentHistoryEntryArchive")
//!     .unwrap();
//! assert_eq!(archive.table_name().chars().count(), 63);
//! assert!(archive.table_name().ends_with('~'));
//! ```
//!
//! Lower-level access to the resolver is available through
//! [`IdentifierResolver`] when names do not come from entity declarations.

pub use storename_core::{
    CollisionError, ConfigError, DEFAULT_MARKER, Dialect, Error, IdentifierResolver,
    MIN_IDENTIFIER_LENGTH, Namespace, ResolutionPass, ResolvedIdentifier, ResolvedNames,
    ResolverConfig, Result, SchemaError, SchemaErrorKind, truncate,
};

pub use storename_schema::{
    ColumnDecl, EntityDecl, ForeignKeyDecl, IndexDecl, KeyDecl, ModelBuilder, ResolvedColumn,
    ResolvedEntity, ResolvedForeignKey, ResolvedIndex, ResolvedKey, ResolvedModel, conventions,
};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Dialect, EntityDecl, Error, ForeignKeyDecl, IdentifierResolver, IndexDecl, ModelBuilder,
        Namespace, ResolvedModel, ResolverConfig, Result,
    };
}
