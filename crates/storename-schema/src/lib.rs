//! Model declarations and identifier resolution for whole models.
//!
//! This crate provides:
//! - Entity, key, foreign key and index declarations
//! - Default naming conventions (`PK_`, `FK_`, `IX_`)
//! - The model build pass that resolves every identifier in declaration order
//! - The immutable resolved model with a JSON snapshot for schema tooling

pub mod builder;
pub mod conventions;
pub mod model;
pub mod resolved;

pub use builder::ModelBuilder;
pub use model::{ColumnDecl, EntityDecl, ForeignKeyDecl, IndexDecl, KeyDecl};
pub use resolved::{
    ResolvedColumn, ResolvedEntity, ResolvedForeignKey, ResolvedIndex, ResolvedKey, ResolvedModel,
};
