//! Resolver configuration.
//!
//! The only knobs are the backend's maximum identifier length and the
//! marker character appended to truncated names. Presets are provided for
//! the usual backends.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Smallest usable max length: one content character, the marker, one suffix digit.
pub const MIN_IDENTIFIER_LENGTH: usize = 3;

/// Default truncation marker.
pub const DEFAULT_MARKER: char = '~';

/// Backends with a known identifier length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// SQL Server (`sysname`, 128 characters)
    #[default]
    SqlServer,
    /// PostgreSQL (`NAMEDATALEN - 1`)
    Postgres,
    /// MySQL
    Mysql,
}

impl Dialect {
    /// Maximum identifier length for this backend.
    pub const fn max_identifier_length(self) -> usize {
        match self {
            Dialect::SqlServer => 128,
            Dialect::Postgres => 63,
            Dialect::Mysql => 64,
        }
    }
}

/// Identifier resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum physical identifier length, in characters
    pub max_length: usize,
    /// Character appended to truncated names
    pub marker: char,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

impl ResolverConfig {
    /// Preset for the given backend.
    pub const fn for_dialect(dialect: Dialect) -> Self {
        Self {
            max_length: dialect.max_identifier_length(),
            marker: DEFAULT_MARKER,
        }
    }

    /// Set the maximum identifier length.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the truncation marker.
    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Check that this configuration can produce disambiguated names.
    pub fn validate(&self) -> Result<()> {
        if self.max_length < MIN_IDENTIFIER_LENGTH {
            return Err(Error::Config(ConfigError::new(format!(
                "max_length {} is below the minimum of {}",
                self.max_length, MIN_IDENTIFIER_LENGTH
            ))));
        }
        if self.marker.is_alphanumeric() || self.marker.is_whitespace() || self.marker.is_control()
        {
            return Err(Error::Config(ConfigError::new(format!(
                "marker {:?} must be a visible non-alphanumeric character",
                self.marker
            ))));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// ```
    /// use storename_core::ResolverConfig;
    ///
    /// let config = ResolverConfig::from_json(r#"{ "max_length": 63 }"#).unwrap();
    /// assert_eq!(config.max_length, 63);
    /// assert_eq!(config.marker, '~');
    /// ```
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid resolver config: {e}"),
                source: Some(Box::new(e)),
            })
        })?;
        config.validate()?;
        Ok(config)
    }
}
