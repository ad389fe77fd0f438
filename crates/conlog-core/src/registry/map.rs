//! Category thresholds and the active registry

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::level::Level;

const ALL_KEY: &str = "all";
const NONE_KEY: &str = "none";

/// Minimum level per category, plus the `all` and `none` sentinels
///
/// Thresholds are kept as raw tokens. A token that is not a known level is
/// accepted here and simply never matches during lookup.
///
/// On the wire this is a flat map, e.g. `{"all": false, "net": "warning"}`.
/// Sentinels missing from a deserialized map are `false`; the in-code
/// `Default` is `{all: true, none: false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct LevelCategoryMap {
    /// Emit everything (unless `none` is set)
    pub all: bool,
    /// Emit nothing; wins over `all`
    pub none: bool,
    categories: BTreeMap<String, String>,
}

impl Default for LevelCategoryMap {
    fn default() -> Self {
        Self {
            all: true,
            none: false,
            categories: BTreeMap::new(),
        }
    }
}

impl LevelCategoryMap {
    /// Default map: everything passes
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with both sentinels cleared, so only configured categories emit
    pub fn filtered() -> Self {
        Self {
            all: false,
            none: false,
            categories: BTreeMap::new(),
        }
    }

    /// Set the `all` sentinel
    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Set the `none` sentinel
    pub fn with_none(mut self, none: bool) -> Self {
        self.none = none;
        self
    }

    /// Set the minimum level for a category
    pub fn with_category(mut self, category: impl Into<String>, level: impl Into<String>) -> Self {
        self.set_category(category, level);
        self
    }

    /// Set the minimum level for a category in place
    pub fn set_category(&mut self, category: impl Into<String>, level: impl Into<String>) {
        self.categories.insert(category.into(), level.into());
    }

    /// Configured threshold token for a category
    pub fn threshold(&self, category: &str) -> Option<&str> {
        self.categories.get(category).map(String::as_str)
    }

    /// Configured `(category, threshold)` pairs
    pub fn categories(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }

    /// Drop every category threshold, keeping the sentinels
    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    /// Filtering decision for a level token
    ///
    /// `none` is checked before `all`, so a map with both set suppresses
    /// everything. Unknown level tokens and unconfigured categories fail
    /// closed.
    pub fn should_log(&self, category: &str, level: &str) -> bool {
        if self.none {
            return false;
        }
        if self.all {
            return true;
        }

        let ask = Level::parse(level).map(|l| l.index());
        let min = self
            .threshold(category)
            .and_then(Level::parse)
            .map(|l| l.index());

        match (ask, min) {
            (Some(ask), Some(min)) => ask >= min,
            _ => false,
        }
    }
}

/// Loose truthiness for sentinel values coming from hand-written config files
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<BTreeMap<String, Value>> for LevelCategoryMap {
    fn from(mut raw: BTreeMap<String, Value>) -> Self {
        let all = raw.remove(ALL_KEY).map(|v| is_truthy(&v)).unwrap_or(false);
        let none = raw.remove(NONE_KEY).map(|v| is_truthy(&v)).unwrap_or(false);
        let categories = raw
            .into_iter()
            .map(|(category, level)| {
                let level = match level {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (category, level)
            })
            .collect();

        Self { all, none, categories }
    }
}

impl From<LevelCategoryMap> for BTreeMap<String, Value> {
    fn from(map: LevelCategoryMap) -> Self {
        let mut raw: BTreeMap<String, Value> = map
            .categories
            .into_iter()
            .map(|(category, level)| (category, Value::String(level)))
            .collect();
        raw.insert(ALL_KEY.to_string(), Value::Bool(map.all));
        raw.insert(NONE_KEY.to_string(), Value::Bool(map.none));
        raw
    }
}

/// Active level configuration
///
/// The map is replaced as a whole, so a reader always sees either the old
/// or the new configuration, never a mix.
#[derive(Debug, Default)]
pub struct LevelRegistry {
    active: RwLock<Arc<LevelCategoryMap>>,
}

impl LevelRegistry {
    /// Registry starting from the default map (everything passes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry starting from the given map
    pub fn with_map(map: LevelCategoryMap) -> Self {
        Self {
            active: RwLock::new(Arc::new(map)),
        }
    }

    /// Replace the entire configuration. No merging, no validation.
    pub fn configure(&self, map: LevelCategoryMap) {
        *self.active.write() = Arc::new(map);
    }

    /// Toggle the `none` sentinel, keeping every other setting
    ///
    /// `all` is never touched, so `set_enabled(false)` suppresses output even
    /// when `all` is still set.
    pub fn set_enabled(&self, enabled: bool) {
        let mut active = self.active.write();
        let mut next = LevelCategoryMap::clone(&active);
        next.none = !enabled;
        *active = Arc::new(next);
    }

    /// Current configuration
    pub fn snapshot(&self) -> Arc<LevelCategoryMap> {
        Arc::clone(&self.active.read())
    }

    /// Filtering decision for a typed level
    pub fn should_log(&self, category: &str, level: Level) -> bool {
        self.should_log_token(category, level.as_str())
    }

    /// Filtering decision for a raw level token
    pub fn should_log_token(&self, category: &str, level: &str) -> bool {
        self.active.read().should_log(category, level)
    }
}
