//! Dispatch layer
//!
//! `ConsoleLogger` is the single entry point: it checks the slow-environment
//! breaker, filters through the level registry, assembles the parameter list
//! and forwards it to the best available sink method.

mod dispatch;
mod params;

pub use dispatch::{ConsoleLogger, DEFAULT_FRAMES_TO_SKIP, SLOW_ENVIRONMENT_NOTICE};
pub use params::{to_payload_value, STRINGIFY_FALLBACK};

/// Convenience macros for logging
///
/// Each takes a logger, a category and any number of serializable values:
///
/// ```
/// use std::sync::Arc;
/// use conlog_core::{con_error, ConsoleLogger, NoOpConsole};
///
/// let logger = ConsoleLogger::new(Arc::new(NoOpConsole::new()));
/// con_error!(logger, "net", "connection failed", 42);
/// ```
#[macro_export]
macro_rules! con_error {
    ($logger:expr, $category:expr $(, $arg:expr)* $(,)?) => {
        $logger.error($category, vec![$($crate::logger::to_payload_value(&$arg)),*])
    };
}

#[macro_export]
macro_rules! con_warning {
    ($logger:expr, $category:expr $(, $arg:expr)* $(,)?) => {
        $logger.warning($category, vec![$($crate::logger::to_payload_value(&$arg)),*])
    };
}

#[macro_export]
macro_rules! con_info {
    ($logger:expr, $category:expr $(, $arg:expr)* $(,)?) => {
        $logger.info($category, vec![$($crate::logger::to_payload_value(&$arg)),*])
    };
}

#[macro_export]
macro_rules! con_debug {
    ($logger:expr, $category:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug($category, vec![$($crate::logger::to_payload_value(&$arg)),*])
    };
}

#[macro_export]
macro_rules! con_log {
    ($logger:expr, $category:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_message($category, vec![$($crate::logger::to_payload_value(&$arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::ConsoleLogger;
    use crate::console::{RecordingConsole, SinkArgs, SinkMethod};

    #[test]
    fn test_macros_convert_payload() {
        let console = Arc::new(RecordingConsole::new());
        let logger = ConsoleLogger::new(console.clone()).with_stack_trace(false);

        crate::con_error!(logger, "net", "connection failed", 42);
        crate::con_warning!(logger, "net", vec![1, 2]);
        crate::con_info!(logger, "net");
        crate::con_debug!(logger, "net", true,);
        crate::con_log!(logger, "net", Some("x"), None::<u8>);

        let calls = console.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[4].method, SinkMethod::Log);
        match &calls[0].args {
            SinkArgs::Params(params) => {
                assert_eq!(params[3..], [json!("connection failed"), json!(42)]);
            }
            other => panic!("expected params, got {:?}", other),
        }
        match &calls[4].args {
            SinkArgs::Params(params) => assert_eq!(params[3..], [json!("x"), json!(null)]),
            other => panic!("expected params, got {:?}", other),
        }
    }
}
