//! Dispatch layer: filtering, record assembly and sink routing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::params::{current_timestamp, stringify_or_fallback, LogRecord, RawArgs};
use crate::console::{SharedConsole, SinkArgs, SinkCapabilities, SinkCapability, SinkMethod};
use crate::registry::{Level, LevelCategoryMap, LevelRegistry};
use crate::stack::{BacktraceCapturer, SharedStackCapturer};

/// Printed once through the basic `log` method when the breaker trips
pub const SLOW_ENVIRONMENT_NOTICE: &str = "This environment is very slow with logs on. \
Disabling logging. You can change this behavior by setting 'detect_slow_environments' to false.";

/// Extra caller frames dropped from captured stacks, after the logger's own
/// frames have been removed
pub const DEFAULT_FRAMES_TO_SKIP: usize = 0;

/// Frames of the logging entry points themselves
///
/// The public wrappers reach the capture point at different depths, and
/// inlining changes those depths further, so internal frames are recognized
/// by symbol rather than counted.
fn is_dispatch_frame(frame: &str) -> bool {
    let symbol = frame.trim_start_matches('<');
    if symbol.starts_with("conlog_core::logger::dispatch::ConsoleLogger") {
        return true;
    }
    match symbol.strip_prefix("conlog_core::global::") {
        Some(rest) => !rest.starts_with("tests::"),
        None => false,
    }
}

/// Where records for one sink method end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Route {
    target: SinkMethod,
    capability: SinkCapability,
}

/// Sink methods resolved once from the sink's advertised capabilities
///
/// Missing `info`/`debug` are aliased to `log`. Any other missing method
/// has no route and its records are dropped.
#[derive(Debug, Clone, Copy)]
struct RouteTable {
    routes: [Option<Route>; 5],
}

impl RouteTable {
    fn resolve(capabilities: SinkCapabilities) -> Self {
        let basic = capabilities.get(SinkMethod::Log).map(|capability| Route {
            target: SinkMethod::Log,
            capability,
        });

        let mut routes = [None; 5];
        for method in SinkMethod::ALL {
            routes[method.slot()] = match capabilities.get(method) {
                Some(capability) => Some(Route { target: method, capability }),
                None => match method {
                    SinkMethod::Info | SinkMethod::Debug => basic,
                    _ => None,
                },
            };
        }
        Self { routes }
    }

    fn route(&self, method: SinkMethod) -> Option<Route> {
        self.routes[method.slot()]
    }

    /// Whether the basic `log` method can take a parameter list
    fn basic_is_variadic(&self) -> bool {
        self.route(SinkMethod::Log)
            .map(|route| route.capability.supports_variadic)
            .unwrap_or(false)
    }
}

/// Level/category filtered logger over a console sink
///
/// Every call is synchronous and never fails: filtered records cost one map
/// lookup, and limited sinks degrade to single-string output.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use conlog_core::{ConsoleLogger, LevelCategoryMap, Level, RecordingConsole};
/// use serde_json::json;
///
/// let console = Arc::new(RecordingConsole::new());
/// let logger = ConsoleLogger::new(console.clone());
/// logger.configure(LevelCategoryMap::filtered().with_category("net", Level::Warning));
///
/// logger.error("net", vec![json!("connection failed")]);
/// logger.info("net", vec![json!("ignored")]);
/// assert_eq!(console.call_count(), 1);
/// ```
pub struct ConsoleLogger {
    registry: LevelRegistry,
    sink: SharedConsole,
    routes: RouteTable,
    capturer: SharedStackCapturer,
    frames_to_skip: usize,
    stack_trace_enabled: AtomicBool,
    detect_slow_environments: AtomicBool,
    slow_environment_detected: AtomicBool,
}

impl ConsoleLogger {
    /// Logger with the default map (everything passes), stack traces on and
    /// slow-environment detection on
    pub fn new(sink: SharedConsole) -> Self {
        let routes = RouteTable::resolve(sink.capabilities());
        Self {
            registry: LevelRegistry::new(),
            sink,
            routes,
            capturer: Arc::new(BacktraceCapturer::new()),
            frames_to_skip: DEFAULT_FRAMES_TO_SKIP,
            stack_trace_enabled: AtomicBool::new(true),
            detect_slow_environments: AtomicBool::new(true),
            slow_environment_detected: AtomicBool::new(false),
        }
    }

    /// Start from a given level configuration
    pub fn with_levels(self, map: LevelCategoryMap) -> Self {
        self.registry.configure(map);
        self
    }

    /// Replace the stack capturer
    pub fn with_stack_capturer(mut self, capturer: SharedStackCapturer) -> Self {
        self.capturer = capturer;
        self
    }

    /// Set how many caller frames are trimmed from captured stacks
    pub fn with_frames_to_skip(mut self, frames: usize) -> Self {
        self.frames_to_skip = frames;
        self
    }

    /// Start with stack traces on or off
    pub fn with_stack_trace(self, enabled: bool) -> Self {
        self.set_stack_trace_enabled(enabled);
        self
    }

    /// Start with slow-environment detection on or off
    pub fn with_detect_slow_environments(self, enabled: bool) -> Self {
        self.set_detect_slow_environments(enabled);
        self
    }

    /// Replace the whole level configuration
    pub fn configure(&self, map: LevelCategoryMap) {
        self.registry.configure(map);
    }

    /// Global kill switch; only toggles the `none` sentinel
    pub fn set_enabled(&self, enabled: bool) {
        self.registry.set_enabled(enabled);
    }

    /// Attach captured stacks to emitted records, or stop doing so
    pub fn set_stack_trace_enabled(&self, enabled: bool) {
        self.stack_trace_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Turn the slow-environment breaker check on or off
    ///
    /// Turning it off does not reset a breaker that already tripped.
    pub fn set_detect_slow_environments(&self, enabled: bool) {
        self.detect_slow_environments.store(enabled, Ordering::Relaxed);
    }

    /// Whether records currently carry a stack trace
    pub fn stack_trace_enabled(&self) -> bool {
        self.stack_trace_enabled.load(Ordering::Relaxed)
    }

    /// Whether the breaker has tripped; permanent once true
    pub fn slow_environment_detected(&self) -> bool {
        self.slow_environment_detected.load(Ordering::Acquire)
    }

    /// Caller frames trimmed from captured stacks
    pub fn frames_to_skip(&self) -> usize {
        self.frames_to_skip
    }

    /// Level configuration in effect
    pub fn levels(&self) -> Arc<LevelCategoryMap> {
        self.registry.snapshot()
    }

    /// Level registry backing this logger
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// Whether a message at `level` in `category` would pass the filter
    pub fn should_log(&self, category: &str, level: Level) -> bool {
        self.registry.should_log(category, level)
    }

    /// Log with a raw level token
    ///
    /// Tokens that are not an emittable level (`"verbose"`, or the `all` and
    /// `none` sentinels) are ignored: no sink call is made, whatever the
    /// configuration.
    pub fn log(&self, level: &str, category: &str, payload: Vec<Value>) {
        if self.breaker_tripped() {
            return;
        }
        if !self.registry.should_log_token(category, level) {
            return;
        }
        if let Some(level) = Level::parse(level) {
            self.emit(level, category, payload);
        }
    }

    /// Log with a typed level
    pub fn log_level(&self, level: Level, category: &str, payload: Vec<Value>) {
        if self.breaker_tripped() {
            return;
        }
        if !self.registry.should_log(category, level) {
            return;
        }
        self.emit(level, category, payload);
    }

    /// Log an error message
    pub fn error(&self, category: &str, payload: Vec<Value>) {
        self.log_level(Level::Error, category, payload);
    }

    /// Log a warning message
    pub fn warning(&self, category: &str, payload: Vec<Value>) {
        self.log_level(Level::Warning, category, payload);
    }

    /// Log an info message
    pub fn info(&self, category: &str, payload: Vec<Value>) {
        self.log_level(Level::Info, category, payload);
    }

    /// Log a debug message
    pub fn debug(&self, category: &str, payload: Vec<Value>) {
        self.log_level(Level::Debug, category, payload);
    }

    /// Log at the `log` level
    pub fn log_message(&self, category: &str, payload: Vec<Value>) {
        self.log_level(Level::Log, category, payload);
    }

    /// Trip the breaker on the first call made through a sink whose basic
    /// method can't take parameter lists
    fn breaker_tripped(&self) -> bool {
        if self.slow_environment_detected.load(Ordering::Acquire) {
            return true;
        }
        if !self.detect_slow_environments.load(Ordering::Relaxed) || self.routes.basic_is_variadic() {
            return false;
        }

        let first = self
            .slow_environment_detected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first && self.routes.route(SinkMethod::Log).is_some() {
            self.sink
                .write(SinkMethod::Log, SinkArgs::Message(SLOW_ENVIRONMENT_NOTICE.to_string()));
        }
        true
    }

    fn emit(&self, level: Level, category: &str, payload: Vec<Value>) {
        let Some(route) = SinkMethod::for_level(level).and_then(|method| self.routes.route(method)) else {
            return;
        };

        let args = if route.capability.supports_variadic {
            SinkArgs::Params(self.build_params(level, category, payload))
        } else {
            let raw = RawArgs {
                level: level.as_str(),
                category,
                payload: &payload,
            };
            SinkArgs::Message(stringify_or_fallback(&raw))
        };

        self.sink.write(route.target, args);
    }

    fn build_params(&self, level: Level, category: &str, payload: Vec<Value>) -> Vec<Value> {
        let stack = if self.stack_trace_enabled() {
            self.capturer.capture().map(|frames| {
                frames
                    .into_iter()
                    .skip_while(|frame| is_dispatch_frame(frame))
                    .skip(self.frames_to_skip)
                    .collect()
            })
        } else {
            None
        };

        LogRecord {
            level,
            category,
            payload,
            timestamp: current_timestamp(),
            stack,
        }
        .into_params()
    }
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("levels", &self.registry.snapshot())
            .field("frames_to_skip", &self.frames_to_skip)
            .field("stack_trace_enabled", &self.stack_trace_enabled())
            .field("slow_environment_detected", &self.slow_environment_detected())
            .finish()
    }
}
