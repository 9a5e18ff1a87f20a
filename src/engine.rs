//! Target database engines.
//!
//! The engine decides which segmenter, rule catalog and evaluator a script is
//! checked with. Selectors coming from the outside are free-form strings and
//! are resolved once through [`Engine::normalize`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database dialect a script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    MySql,
    PostgreSql,
    MongoDb
}

impl Engine {
    /// Every supported engine, in display order.
    pub const ALL: [Engine; 3] = [Engine::MySql, Engine::PostgreSql, Engine::MongoDb];

    /// Resolve a selector such as `"pg"` or `"MongoDB"`.
    ///
    /// Aliases are matched case-insensitively after trimming. Empty and
    /// unknown selectors fall back to MySQL.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Self::PostgreSql,
            "mongo" | "mongodb" => Self::MongoDb,
            "mysql" | "" => Self::MySql,
            other => {
                tracing::debug!(selector = other, "unknown engine, falling back to mysql");
                Self::MySql
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::MongoDb => "mongodb"
        }
    }

    /// Accepted selector aliases besides the canonical name.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MySql => &[],
            Self::PostgreSql => &["pg", "postgres"],
            Self::MongoDb => &["mongo"]
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
