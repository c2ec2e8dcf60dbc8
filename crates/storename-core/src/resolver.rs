//! Store identifier resolution.
//!
//! Turns logical names proposed by the model layer into physical names that
//! fit the backend's length limit and are unique inside their namespace.
//!
//! Names that fit are used verbatim. Longer names are cut to
//! `max_length - 1` characters and the marker is appended. When that
//! candidate is already taken, the prefix is shortened further and a
//! numeric suffix is appended after the marker (`~1`, `~2`, ... `~10`),
//! so the result never exceeds `max_length`.
//!
//! Processing order is the order in which names are declared. The same
//! declarations in the same order always produce the same physical names.
//!
//! # Example
//!
//! ```
//! use storename_core::{IdentifierResolver, Namespace, ResolverConfig};
//!
//! let resolver = IdentifierResolver::new(ResolverConfig::default().max_length(8)).unwrap();
//! let names = resolver
//!     .resolve([
//!         (Namespace::Table, "Orders"),
//!         (Namespace::Table, "OrderLinesArchive"),
//!         (Namespace::Table, "OrderLinesHistory"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(names.get(&Namespace::Table, "Orders"), Some("Orders"));
//! assert_eq!(names.get(&Namespace::Table, "OrderLinesArchive"), Some("OrderLi~"));
//! assert_eq!(names.get(&Namespace::Table, "OrderLinesHistory"), Some("OrderL~1"));
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::config::ResolverConfig;
use crate::error::{CollisionError, ConfigError, Error, Result};
use crate::namespace::Namespace;

/// Truncate `name` to fit `max_length`, appending `marker` and, when
/// `suffix > 0`, the suffix digits.
///
/// The content part keeps `max_length - 1 - digits(suffix)` characters of
/// `name`. Fails when no content character would remain.
///
/// ```
/// use storename_core::truncate;
///
/// assert_eq!(truncate("CustomerAddresses", 10, '~', 0).unwrap(), "CustomerA~");
/// assert_eq!(truncate("CustomerAddresses", 10, '~', 1).unwrap(), "Customer~1");
/// assert_eq!(truncate("CustomerAddresses", 10, '~', 12).unwrap(), "Custome~12");
/// ```
pub fn truncate(name: &str, max_length: usize, marker: char, suffix: usize) -> Result<String> {
    let digits = if suffix == 0 {
        String::new()
    } else {
        suffix.to_string()
    };
    let reserved = 1 + digits.len();
    if max_length <= reserved {
        return Err(Error::Config(ConfigError::new(format!(
            "max_length {} leaves no room for content before '{}{}'",
            max_length, marker, digits
        ))));
    }

    let mut truncated: String = name.chars().take(max_length - reserved).collect();
    truncated.push(marker);
    truncated.push_str(&digits);
    Ok(truncated)
}

/// One resolved identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentifier {
    /// Namespace the name was declared in
    pub namespace: Namespace,
    /// Name proposed by the model
    pub logical: String,
    /// Name emitted into the schema
    pub physical: String,
    /// Whether the logical name had to be shortened
    pub truncated: bool,
    /// Disambiguation suffix, if one was needed
    pub suffix: Option<usize>,
    /// Model object that declared the name, when the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Mapping from `(namespace, logical name)` to physical name.
///
/// Iteration yields identifiers in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedNames {
    entries: Vec<ResolvedIdentifier>,
    #[serde(skip)]
    index: HashMap<Namespace, HashMap<String, usize>>,
}

impl ResolvedNames {
    /// Physical name for a logical name, if it was declared.
    pub fn get(&self, namespace: &Namespace, logical: &str) -> Option<&str> {
        self.entry(namespace, logical).map(|e| e.physical.as_str())
    }

    /// Full resolution record for a logical name.
    pub fn entry(&self, namespace: &Namespace, logical: &str) -> Option<&ResolvedIdentifier> {
        let idx = *self.index.get(namespace)?.get(logical)?;
        self.entries.get(idx)
    }

    /// All identifiers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedIdentifier> {
        self.entries.iter()
    }

    /// Identifiers of one namespace, in declaration order.
    pub fn in_namespace<'a>(
        &'a self,
        namespace: &'a Namespace,
    ) -> impl Iterator<Item = &'a ResolvedIdentifier> + 'a {
        self.entries.iter().filter(move |e| &e.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: ResolvedIdentifier) {
        let idx = self.entries.len();
        self.index
            .entry(entry.namespace.clone())
            .or_default()
            .insert(entry.logical.clone(), idx);
        self.entries.push(entry);
    }
}

impl<'a> IntoIterator for &'a ResolvedNames {
    type Item = &'a ResolvedIdentifier;
    type IntoIter = std::slice::Iter<'a, ResolvedIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Per-namespace bookkeeping for one pass.
#[derive(Debug, Default)]
struct NamespaceState {
    /// Physical name -> index of the owning entry
    owners: HashMap<String, usize>,
    /// Truncation candidate -> next suffix to try
    next_suffix: HashMap<String, usize>,
}

/// Resolves logical names to physical identifiers.
///
/// The resolver itself holds only read-only configuration; every call to
/// [`begin`](Self::begin) or [`resolve`](Self::resolve) starts from fresh
/// state, so independent passes can run concurrently.
#[derive(Debug, Clone, Default)]
pub struct IdentifierResolver {
    config: ResolverConfig,
}

impl IdentifierResolver {
    /// Create a resolver, validating the configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Start an incremental resolution pass.
    pub fn begin(&self) -> ResolutionPass<'_> {
        ResolutionPass {
            config: &self.config,
            names: ResolvedNames::default(),
            states: HashMap::new(),
        }
    }

    /// Resolve an ordered sequence of declarations in one pass.
    ///
    /// Declarations are processed in iteration order; within a namespace the
    /// first declaration of a truncated form keeps the plain marker and later
    /// ones receive suffixes.
    #[tracing::instrument(
        level = "debug",
        skip(self, declarations),
        fields(max_length = self.config.max_length)
    )]
    pub fn resolve<I, N>(&self, declarations: I) -> Result<ResolvedNames>
    where
        I: IntoIterator<Item = (Namespace, N)>,
        N: Into<String>,
    {
        let mut pass = self.begin();
        for (namespace, logical) in declarations {
            pass.declare(namespace, logical)?;
        }
        let names = pass.finish();
        tracing::debug!(count = names.len(), "Resolved identifiers");
        Ok(names)
    }
}

/// State of one resolution pass.
///
/// Created by [`IdentifierResolver::begin`]. All counters live here and are
/// dropped with the pass.
#[derive(Debug)]
pub struct ResolutionPass<'r> {
    config: &'r ResolverConfig,
    names: ResolvedNames,
    states: HashMap<Namespace, NamespaceState>,
}

impl ResolutionPass<'_> {
    /// Resolve one logical name and return its physical name.
    ///
    /// Declaring the same logical name again in the same namespace returns
    /// the name assigned the first time.
    pub fn declare(&mut self, namespace: Namespace, logical: impl Into<String>) -> Result<String> {
        self.declare_inner(namespace, logical.into(), None)
    }

    /// Resolve one logical name on behalf of `owner`.
    ///
    /// Re-declaration is idempotent only for the same owner. A different
    /// owner asking for a logical name that is already declared gets
    /// `Error::NamespaceCollision`, since both would share one physical name.
    pub fn declare_for(
        &mut self,
        namespace: Namespace,
        logical: impl Into<String>,
        owner: impl Into<String>,
    ) -> Result<String> {
        self.declare_inner(namespace, logical.into(), Some(owner.into()))
    }

    fn declare_inner(
        &mut self,
        namespace: Namespace,
        logical: String,
        owner: Option<String>,
    ) -> Result<String> {
        if let Some(existing) = self.names.entry(&namespace, &logical) {
            if existing.owner == owner {
                return Ok(existing.physical.clone());
            }
            let err = CollisionError {
                namespace,
                physical: existing.physical.clone(),
                existing_logical: existing.logical.clone(),
                existing_owner: existing.owner.clone(),
                logical,
                owner,
            };
            tracing::warn!(collision = %err, "Identifier declared by two owners");
            return Err(Error::NamespaceCollision(err));
        }

        let max_length = self.config.max_length;
        let marker = self.config.marker;
        let state = self.states.entry(namespace.clone()).or_default();

        let (physical, truncated, suffix) = if logical.chars().count() <= max_length {
            if let Some(&held_by) = state.owners.get(&logical) {
                let existing = &self.names.entries[held_by];
                let err = CollisionError {
                    namespace,
                    physical: logical.clone(),
                    existing_logical: existing.logical.clone(),
                    existing_owner: existing.owner.clone(),
                    logical,
                    owner,
                };
                tracing::warn!(collision = %err, "Identifier already in use");
                return Err(Error::NamespaceCollision(err));
            }
            tracing::trace!(namespace = %namespace, name = %logical, "Identifier fits");
            (logical.clone(), false, None)
        } else {
            let candidate = truncate(&logical, max_length, marker, 0)?;
            if state.owners.contains_key(&candidate) {
                let mut next = state.next_suffix.get(&candidate).copied().unwrap_or(1);
                let physical = loop {
                    let attempt = truncate(&logical, max_length, marker, next)?;
                    next += 1;
                    if !state.owners.contains_key(&attempt) {
                        break attempt;
                    }
                };
                state.next_suffix.insert(candidate, next);
                tracing::debug!(
                    namespace = %namespace,
                    logical = %logical,
                    physical = %physical,
                    suffix = next - 1,
                    "Identifier truncated and disambiguated"
                );
                (physical, true, Some(next - 1))
            } else {
                tracing::debug!(
                    namespace = %namespace,
                    logical = %logical,
                    physical = %candidate,
                    "Identifier truncated"
                );
                (candidate, true, None)
            }
        };

        state.owners.insert(physical.clone(), self.names.entries.len());
        self.names.push(ResolvedIdentifier {
            namespace,
            logical,
            physical: physical.clone(),
            truncated,
            suffix,
            owner,
        });
        Ok(physical)
    }

    /// Physical name already assigned in this pass, if any.
    pub fn get(&self, namespace: &Namespace, logical: &str) -> Option<&str> {
        self.names.get(namespace, logical)
    }

    /// Finish the pass, returning the immutable mapping.
    pub fn finish(self) -> ResolvedNames {
        self.names
    }
}
