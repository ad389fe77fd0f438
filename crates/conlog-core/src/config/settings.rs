//! Settings file and environment overrides

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::console::{SharedConsole, StdConsole};
use crate::logger::{ConsoleLogger, DEFAULT_FRAMES_TO_SKIP};
use crate::registry::LevelCategoryMap;

/// `0`/`false` disables all output, `1`/`true` re-enables it
pub const ENV_ENABLED: &str = "CONLOG_ENABLED";
/// `0`/`false` or `1`/`true`
pub const ENV_STACK_TRACE: &str = "CONLOG_STACK_TRACE";
/// Category thresholds, e.g. `net=warning,db=info`; clears `all`
pub const ENV_LEVELS: &str = "CONLOG_LEVELS";

fn default_true() -> bool {
    true
}

fn default_frames_to_skip() -> usize {
    DEFAULT_FRAMES_TO_SKIP
}

/// Everything needed to build a [`ConsoleLogger`]
///
/// ```yaml
/// levels:
///   net: warning
///   db: info
/// stack_trace: false
/// prefix: "[app]"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Category thresholds and sentinels; everything passes when omitted
    #[serde(default)]
    pub levels: LevelCategoryMap,

    /// Attach a `{stacktrace: [...]}` object to emitted records
    #[serde(default = "default_true")]
    pub stack_trace: bool,

    /// Disable all output on sinks whose basic method can't take parameter lists
    #[serde(default = "default_true")]
    pub detect_slow_environments: bool,

    /// Caller frames trimmed from captured stacks, after the logger's own frames
    #[serde(default = "default_frames_to_skip")]
    pub frames_to_skip: usize,

    /// Line prefix for the standard console
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            levels: LevelCategoryMap::default(),
            stack_trace: true,
            detect_slow_environments: true,
            frames_to_skip: DEFAULT_FRAMES_TO_SKIP,
            prefix: None,
        }
    }
}

impl LoggerSettings {
    /// Parse settings from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse settings from JSON text
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Render settings as YAML
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load settings from a file
    ///
    /// `.json` files are read as JSON, `.yaml`/`.yml` (or no extension) as
    /// YAML. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") | None => Self::from_yaml_str(&content),
            Some(other) => Err(ConfigError::Other(format!(
                "Unsupported settings format: {}",
                other
            ))),
        }
    }

    /// Write settings as YAML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// User-level settings file (~/.config/conlog/config.yaml)
    pub fn user_config_path() -> PathBuf {
        // Use XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("conlog").join("config.yaml")
    }

    /// User-level settings with environment overrides applied
    pub fn load_user() -> ConfigResult<Self> {
        Ok(Self::from_file(Self::user_config_path())?.apply_env())
    }

    /// Apply `CONLOG_*` overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `CONLOG_*` overrides from an arbitrary lookup
    ///
    /// Values that don't parse are ignored.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(enabled) = lookup(ENV_ENABLED).as_deref().and_then(parse_flag) {
            self.levels.none = !enabled;
        }

        if let Some(stack_trace) = lookup(ENV_STACK_TRACE).as_deref().and_then(parse_flag) {
            self.stack_trace = stack_trace;
        }

        if let Some(levels) = lookup(ENV_LEVELS) {
            let thresholds = parse_thresholds(&levels);
            if !thresholds.is_empty() {
                self.levels.all = false;
                self.levels.clear_categories();
                for (category, level) in thresholds {
                    self.levels.set_category(category, level);
                }
            }
        }

        self
    }

    /// Build a logger over the given sink
    pub fn build(&self, sink: SharedConsole) -> ConsoleLogger {
        ConsoleLogger::new(sink)
            .with_levels(self.levels.clone())
            .with_stack_trace(self.stack_trace)
            .with_detect_slow_environments(self.detect_slow_environments)
            .with_frames_to_skip(self.frames_to_skip)
    }

    /// Build a logger over stdout/stderr
    pub fn build_std(&self) -> ConsoleLogger {
        let console = match &self.prefix {
            Some(prefix) => StdConsole::with_prefix(prefix.clone()),
            None => StdConsole::new(),
        };
        self.build(Arc::new(console))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// `net=warning, db=info` → `[("net", "warning"), ("db", "info")]`
fn parse_thresholds(value: &str) -> Vec<(String, String)> {
    value
        .split(',')
        .filter_map(|entry| {
            let (category, level) = entry.split_once('=')?;
            let (category, level) = (category.trim(), level.trim());
            if category.is_empty() || level.is_empty() {
                return None;
            }
            Some((category.to_string(), level.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    use crate::console::RecordingConsole;
    use crate::registry::Level;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = LoggerSettings::default();
        assert!(settings.levels.all);
        assert!(!settings.levels.none);
        assert!(settings.stack_trace);
        assert!(settings.detect_slow_environments);
        assert_eq!(settings.frames_to_skip, DEFAULT_FRAMES_TO_SKIP);
    }

    #[test]
    fn test_yaml_settings() {
        let settings = LoggerSettings::from_yaml_str(
            "levels:\n  net: warning\n  db: info\nstack_trace: false\nprefix: \"[app]\"\n",
        )
        .unwrap();

        assert!(!settings.levels.all);
        assert_eq!(settings.levels.threshold("net"), Some("warning"));
        assert!(!settings.stack_trace);
        assert!(settings.detect_slow_environments);
        assert_eq!(settings.prefix.as_deref(), Some("[app]"));
    }

    #[test]
    fn test_empty_yaml_mapping_uses_defaults() {
        let settings = LoggerSettings::from_yaml_str("{}").unwrap();
        assert_eq!(settings, LoggerSettings::default());
    }

    #[test]
    fn test_json_settings() {
        let settings =
            LoggerSettings::from_json_str(r#"{"levels": {"all": true, "none": true}, "frames_to_skip": 1}"#)
                .unwrap();
        assert!(settings.levels.none);
        assert_eq!(settings.frames_to_skip, 1);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let result = LoggerSettings::from_yaml_str("levels: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        // Missing file gives defaults
        assert_eq!(LoggerSettings::from_file(&path).unwrap(), LoggerSettings::default());

        let settings = LoggerSettings {
            levels: LevelCategoryMap::filtered().with_category("net", Level::Error),
            stack_trace: false,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("net: error"));
        assert_eq!(LoggerSettings::from_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_json_file_and_unknown_extension() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        fs::write(&json_path, r#"{"stack_trace": false}"#).unwrap();
        assert!(!LoggerSettings::from_file(&json_path).unwrap().stack_trace);

        let toml_path = dir.path().join("config.toml");
        fs::write(&toml_path, "stack_trace = false").unwrap();
        assert!(matches!(
            LoggerSettings::from_file(&toml_path),
            Err(ConfigError::Other(_))
        ));
    }

    #[test]
    fn test_user_config_path() {
        let path = LoggerSettings::user_config_path();
        assert!(path.ends_with("conlog/config.yaml"));
    }

    #[test]
    fn test_env_overrides() {
        let settings = LoggerSettings::default().apply_env_from(env(&[
            (ENV_ENABLED, "false"),
            (ENV_STACK_TRACE, "0"),
            (ENV_LEVELS, "net=warning, db = info,broken,=x"),
        ]));

        assert!(settings.levels.none);
        assert!(!settings.levels.all);
        assert!(!settings.stack_trace);
        assert_eq!(settings.levels.threshold("net"), Some("warning"));
        assert_eq!(settings.levels.threshold("db"), Some("info"));
        assert_eq!(settings.levels.categories().count(), 2);
    }

    #[test]
    fn test_unparseable_env_is_ignored() {
        let settings = LoggerSettings::default().apply_env_from(env(&[
            (ENV_ENABLED, "maybe"),
            (ENV_STACK_TRACE, ""),
            (ENV_LEVELS, "garbage"),
        ]));
        assert_eq!(settings, LoggerSettings::default());
    }

    #[test]
    fn test_build_logger() {
        let console = Arc::new(RecordingConsole::new());
        let settings = LoggerSettings {
            levels: LevelCategoryMap::filtered().with_category("net", Level::Warning),
            stack_trace: false,
            frames_to_skip: 5,
            ..Default::default()
        };
        let logger = settings.build(console.clone());

        assert!(!logger.stack_trace_enabled());
        assert_eq!(logger.frames_to_skip(), 5);
        logger.info("net", vec![]);
        logger.error("net", vec![]);
        assert_eq!(console.call_count(), 1);
    }
}
