//! No-op console implementation

use super::traits::{ConsoleSink, SinkArgs, SinkCapabilities, SinkMethod};

/// A console that does nothing
///
/// Advertises every method as variadic, so a logger built on it never trips
/// the slow-environment breaker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpConsole;

impl NoOpConsole {
    /// Create a new no-op console
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for NoOpConsole {
    fn capabilities(&self) -> SinkCapabilities {
        SinkCapabilities::full()
    }

    fn write(&self, _method: SinkMethod, _args: SinkArgs) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_console() {
        let console = NoOpConsole::new();
        assert_eq!(console.capabilities(), SinkCapabilities::full());

        // These should all do nothing without panicking
        for method in SinkMethod::ALL {
            console.write(method, SinkArgs::Message("message".to_string()));
        }
    }
}
