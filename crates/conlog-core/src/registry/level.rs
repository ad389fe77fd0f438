//! Severity levels

use serde::{Deserialize, Serialize};

/// Ordered level tokens, lowest first. Filtering compares positions in this list.
pub const LEVELS: [Level; 7] = [
    Level::All,
    Level::Log,
    Level::Debug,
    Level::Info,
    Level::Warning,
    Level::Error,
    Level::None,
];

/// Severity level
///
/// `All` and `None` are configuration sentinels. They order below and above
/// every emittable level but are never emitted themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    All,
    Log,
    Debug,
    Info,
    Warning,
    Error,
    None,
}

impl Level {
    /// Token used in configuration maps and in the emitted `[level]` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::All => "all",
            Level::Log => "log",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::None => "none",
        }
    }

    /// Parse a level token
    ///
    /// Unknown tokens yield `None` rather than an error; callers treat an
    /// unresolved level as "never matches".
    pub fn parse(token: &str) -> Option<Level> {
        LEVELS.iter().copied().find(|level| level.as_str() == token)
    }

    /// Position in [`LEVELS`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether this level can be attached to an emitted record
    pub fn is_emittable(&self) -> bool {
        !matches!(self, Level::All | Level::None)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}
