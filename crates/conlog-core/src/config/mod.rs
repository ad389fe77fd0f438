//! Logger settings
//!
//! Settings can come from code, a YAML or JSON file
//! (`~/.config/conlog/config.yaml` by default) and `CONLOG_*` environment
//! overrides. Loading can fail; logging itself never does.

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{LoggerSettings, ENV_ENABLED, ENV_LEVELS, ENV_STACK_TRACE};
