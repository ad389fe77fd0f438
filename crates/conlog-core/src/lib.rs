//! Conlog Core
//!
//! Level/category filtered logging over a console sink of unknown abilities.
//! This crate provides the core functionality that can be used with any
//! output (stdout/stderr, a host console bridge, an in-memory recorder, etc.)
//!
//! ## Filtering
//!
//! Every category has a minimum level. A message is emitted when its level
//! is at or above the category's floor:
//!
//! ```rust
//! use std::sync::Arc;
//! use conlog_core::{ConsoleLogger, Level, LevelCategoryMap, StdConsole};
//! use serde_json::json;
//!
//! let logger = ConsoleLogger::new(Arc::new(StdConsole::new()));
//! logger.configure(
//!     LevelCategoryMap::filtered()
//!         .with_category("net", Level::Warning)
//!         .with_category("db", Level::Debug),
//! );
//!
//! logger.error("net", vec![json!("connection failed"), json!(42)]); // emitted
//! logger.info("net", vec![json!("handshake")]);                     // filtered
//! ```
//!
//! Emitted records are `"<MM/DD/YYYY HH:MM:SS.mmm> - "`, `"[level]"`,
//! `"[category]"`, the payload, and optionally `{"stacktrace": [...]}`.

pub mod registry;
pub mod console;
pub mod stack;
pub mod logger;
pub mod config;
pub mod global;

// Re-export commonly used types
pub use registry::{Level, LevelCategoryMap, LevelRegistry, LEVELS};

pub use console::{
    ConsoleSink, SharedConsole, SinkArgs, SinkCapabilities, SinkCapability, SinkMethod,
    StdConsole, NoOpConsole, RecordingConsole, RecordedCall,
};

pub use stack::{StackCapturer, SharedStackCapturer, BacktraceCapturer, NoopStackCapturer};

pub use logger::{ConsoleLogger, DEFAULT_FRAMES_TO_SKIP, SLOW_ENVIRONMENT_NOTICE, STRINGIFY_FALLBACK};

pub use config::{LoggerSettings, ConfigError, ConfigResult};
