// ABOUTME: Database configuration types for the SQLite store
// ABOUTME: Parses DATABASE_URL into a typed file-backed or in-memory location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// Accepts `sqlite:<path>`, `sqlite::memory:` or a bare file path.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s
            .strip_prefix("sqlite://")
            .or_else(|| s.strip_prefix("sqlite:"))
            .unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Database file inside `data_dir`
    #[must_use]
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::SQLite {
            path: data_dir.join("nutriveci.db"),
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_variants() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/x.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/x.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/y.db").to_connection_string(),
            "sqlite:/tmp/y.db"
        );
    }
}
