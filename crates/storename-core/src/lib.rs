//! Core types for store identifier resolution.
//!
//! This crate provides:
//!
//! - `IdentifierResolver` turning logical names into length-bounded, unique physical names
//! - `Namespace` partitions within which physical names must be distinct
//! - `ResolverConfig` with backend presets
//! - `Error` types shared by the model-building layer

pub mod config;
pub mod error;
pub mod namespace;
pub mod resolver;

pub use config::{DEFAULT_MARKER, Dialect, MIN_IDENTIFIER_LENGTH, ResolverConfig};
pub use error::{CollisionError, ConfigError, Error, Result, SchemaError, SchemaErrorKind};
pub use namespace::Namespace;
pub use resolver::{IdentifierResolver, ResolutionPass, ResolvedIdentifier, ResolvedNames, truncate};
