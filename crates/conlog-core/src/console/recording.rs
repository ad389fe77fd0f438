//! In-memory recording console for testing

use parking_lot::Mutex;

use super::traits::{ConsoleSink, SinkArgs, SinkCapabilities, SinkMethod};

/// One call made to a [`RecordingConsole`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: SinkMethod,
    pub args: SinkArgs,
}

/// Console that stores every call instead of printing it
///
/// Capabilities are configurable so limited hosts (missing methods, no
/// variadic support) can be simulated.
#[derive(Debug)]
pub struct RecordingConsole {
    capabilities: SinkCapabilities,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for RecordingConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingConsole {
    /// Console with every method present and variadic
    pub fn new() -> Self {
        Self::with_capabilities(SinkCapabilities::full())
    }

    /// Console advertising the given capabilities
    pub fn with_capabilities(capabilities: SinkCapabilities) -> Self {
        Self {
            capabilities,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Most recent call
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// Forget all recorded calls
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl ConsoleSink for RecordingConsole {
    fn capabilities(&self) -> SinkCapabilities {
        self.capabilities
    }

    fn write(&self, method: SinkMethod, args: SinkArgs) {
        self.calls.lock().push(RecordedCall { method, args });
    }
}
