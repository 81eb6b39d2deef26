use serde::{Deserialize, Serialize};

/// What the store does when an insert hits an existing primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Reject the write (store default, no optarg emitted).
    #[default]
    Error,
    /// Replace the stored document.
    Replace,
    /// Merge into the stored document.
    Update,
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStrategy::Error => "error",
            ConflictStrategy::Replace => "replace",
            ConflictStrategy::Update => "update",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    #[default]
    Hard,
    Soft,
}

/// Translator configuration.
///
/// - `database` qualifies every table as `db(database).table(name)`.
/// - `return_changes` asks the store to echo old/new values on writes.
/// - `conflict` and `durability` are forwarded as write optargs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub database: Option<String>,
    pub return_changes: bool,
    pub conflict: ConflictStrategy,
    pub durability: Durability,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(database: &str) -> Self {
        Self {
            database: Some(database.to_string()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}
