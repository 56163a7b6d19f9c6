//! Mapping manager configuration.

use std::path::PathBuf;

/// Path understood by the engine as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Mapping manager configuration.
#[derive(Debug, Clone)]
pub struct OrmConfig {
    /// Database file opened by the engine (":memory:" for an in-memory database)
    pub database_path: PathBuf,
    /// Enable foreign key enforcement on the connection
    pub enforce_foreign_keys: bool,
}

impl OrmConfig {
    /// Configuration for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Default::default()
        }
    }

    /// Configuration for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    /// Returns true if the configured path names an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./database.db"),
            enforce_foreign_keys: true,
        }
    }
}
