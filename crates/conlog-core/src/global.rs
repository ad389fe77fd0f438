//! Process-wide default logger
//!
//! Free functions mirroring the [`ConsoleLogger`] API, backed by one shared
//! instance. The default instance writes to stdout/stderr with everything
//! enabled; [`install`] swaps in another one.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;

use crate::console::StdConsole;
use crate::logger::ConsoleLogger;
use crate::registry::{Level, LevelCategoryMap};

/// Global logger instance
static LOGGER: Lazy<RwLock<Arc<ConsoleLogger>>> =
    Lazy::new(|| RwLock::new(Arc::new(ConsoleLogger::new(Arc::new(StdConsole::new())))));

/// Current global logger
pub fn logger() -> Arc<ConsoleLogger> {
    Arc::clone(&LOGGER.read())
}

/// Replace the global logger, returning the previous one
pub fn install(logger: ConsoleLogger) -> Arc<ConsoleLogger> {
    std::mem::replace(&mut *LOGGER.write(), Arc::new(logger))
}

/// Replace the global level configuration
pub fn configure(map: LevelCategoryMap) {
    logger().configure(map);
}

/// Global kill switch
pub fn set_enabled(enabled: bool) {
    logger().set_enabled(enabled);
}

/// Turn stack traces on or off
pub fn set_stack_trace_enabled(enabled: bool) {
    logger().set_stack_trace_enabled(enabled);
}

/// Turn slow-environment detection on or off
pub fn set_detect_slow_environments(enabled: bool) {
    logger().set_detect_slow_environments(enabled);
}

/// Log with a raw level token; unknown tokens are ignored
pub fn log(level: &str, category: &str, payload: Vec<Value>) {
    logger().log(level, category, payload);
}

/// Log with a typed level
pub fn log_level(level: Level, category: &str, payload: Vec<Value>) {
    logger().log_level(level, category, payload);
}

/// Log an error message
pub fn error(category: &str, payload: Vec<Value>) {
    logger().error(category, payload);
}

/// Log a warning message
pub fn warning(category: &str, payload: Vec<Value>) {
    logger().warning(category, payload);
}

/// Log an info message
pub fn info(category: &str, payload: Vec<Value>) {
    logger().info(category, payload);
}

/// Log a debug message
pub fn debug(category: &str, payload: Vec<Value>) {
    logger().debug(category, payload);
}

/// Log at the `log` level
pub fn log_message(category: &str, payload: Vec<Value>) {
    logger().log_message(category, payload);
}
