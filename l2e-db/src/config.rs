//! Database configuration

use serde::{Deserialize, Serialize};

/// URL that selects the in-process map instead of SQLite
pub const MEMORY_STORE_URL: &str = "mem://";

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// `sqlite::memory:`, `sqlite://path/to/file.db`, or `mem://`
    pub url: String,
    /// Pool size for file-backed databases
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://learn2earn.db".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// In-memory SQLite database (one connection, lives as long as the pool)
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Whether the URL selects the in-process map store
    pub fn is_memory_store(&self) -> bool {
        self.url == MEMORY_STORE_URL
    }

    /// Whether the URL names an in-memory SQLite database
    pub fn is_sqlite_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_kinds() {
        assert!(DbConfig::in_memory().is_sqlite_memory());
        assert!(!DbConfig::in_memory().is_memory_store());
        assert!(DbConfig::new("mem://").is_memory_store());
        assert!(!DbConfig::default().is_sqlite_memory());
    }
}
