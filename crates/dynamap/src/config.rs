//! Environment configuration.
//!
//! The store client (connection, region, credentials) is configured by the
//! caller that builds it; the only knob this layer owns is the table name.

use std::env;

/// Table name used when `DYNAMAP_TABLE_NAME` is not set.
pub const DEFAULT_TABLE_NAME: &str = "dynamap";

/// Configuration for the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The name of the store table all writes and reads target.
    pub table_name: String,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// Uses `DYNAMAP_TABLE_NAME`, falling back to [`DEFAULT_TABLE_NAME`].
    pub fn from_env() -> Self {
        let table_name =
            env::var("DYNAMAP_TABLE_NAME").unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());
        Self { table_name }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}
