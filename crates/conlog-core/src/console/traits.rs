//! Console sink trait definition

use std::sync::Arc;

use serde_json::Value;

use crate::registry::Level;

/// Output method exposed by a console sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkMethod {
    Log,
    Debug,
    Info,
    Warn,
    Error,
}

impl SinkMethod {
    pub const ALL: [SinkMethod; 5] = [
        SinkMethod::Log,
        SinkMethod::Debug,
        SinkMethod::Info,
        SinkMethod::Warn,
        SinkMethod::Error,
    ];

    /// Method name as a host console spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkMethod::Log => "log",
            SinkMethod::Debug => "debug",
            SinkMethod::Info => "info",
            SinkMethod::Warn => "warn",
            SinkMethod::Error => "error",
        }
    }

    /// Method a level is written through. Sentinel levels have none.
    pub fn for_level(level: Level) -> Option<SinkMethod> {
        match level {
            Level::Log => Some(SinkMethod::Log),
            Level::Debug => Some(SinkMethod::Debug),
            Level::Info => Some(SinkMethod::Info),
            Level::Warning => Some(SinkMethod::Warn),
            Level::Error => Some(SinkMethod::Error),
            Level::All | Level::None => None,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for SinkMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single sink method can accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkCapability {
    /// Accepts the full parameter list; otherwise only one string
    pub supports_variadic: bool,
}

impl SinkCapability {
    pub const VARIADIC: SinkCapability = SinkCapability { supports_variadic: true };
    pub const SINGLE: SinkCapability = SinkCapability { supports_variadic: false };
}

/// Capabilities of every method of a sink; `None` means the method is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkCapabilities {
    methods: [Option<SinkCapability>; 5],
}

impl SinkCapabilities {
    /// No methods at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every method present and variadic
    pub fn full() -> Self {
        Self {
            methods: [Some(SinkCapability::VARIADIC); 5],
        }
    }

    /// Mark a method present with the given capability
    pub fn with(mut self, method: SinkMethod, capability: SinkCapability) -> Self {
        self.methods[method.slot()] = Some(capability);
        self
    }

    /// Mark a method absent
    pub fn without(mut self, method: SinkMethod) -> Self {
        self.methods[method.slot()] = None;
        self
    }

    /// Capability of a method, `None` when absent
    pub fn get(&self, method: SinkMethod) -> Option<SinkCapability> {
        self.methods[method.slot()]
    }
}

/// Arguments handed to a sink method
#[derive(Debug, Clone, PartialEq)]
pub enum SinkArgs {
    /// Full parameter list, for variadic methods
    Params(Vec<Value>),
    /// Single pre-rendered string, for everything else
    Message(String),
}

/// Console sink abstraction
///
/// Implementations:
/// - `StdConsole`: stdout for log/debug/info, stderr for warn/error
/// - `NoOpConsole`: silent sink
/// - `RecordingConsole`: captures calls for assertions
///
/// `capabilities` is read once when a logger is built; a sink must keep
/// honoring what it advertised there.
pub trait ConsoleSink: Send + Sync {
    /// Which methods exist and whether they take variadic arguments
    fn capabilities(&self) -> SinkCapabilities;

    /// Write through one method. Only called for methods advertised as present.
    fn write(&self, method: SinkMethod, args: SinkArgs);
}

/// Type alias for an Arc-wrapped sink
pub type SharedConsole = Arc<dyn ConsoleSink>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_to_method() {
        assert_eq!(SinkMethod::for_level(Level::Error), Some(SinkMethod::Error));
        assert_eq!(SinkMethod::for_level(Level::Warning), Some(SinkMethod::Warn));
        assert_eq!(SinkMethod::for_level(Level::Debug), Some(SinkMethod::Debug));
        assert_eq!(SinkMethod::for_level(Level::Info), Some(SinkMethod::Info));
        assert_eq!(SinkMethod::for_level(Level::Log), Some(SinkMethod::Log));
        assert_eq!(SinkMethod::for_level(Level::All), None);
        assert_eq!(SinkMethod::for_level(Level::None), None);
    }

    #[test]
    fn test_capabilities_builder() {
        let caps = SinkCapabilities::full()
            .without(SinkMethod::Info)
            .with(SinkMethod::Warn, SinkCapability::SINGLE);

        assert_eq!(caps.get(SinkMethod::Info), None);
        assert_eq!(caps.get(SinkMethod::Warn), Some(SinkCapability::SINGLE));
        assert_eq!(caps.get(SinkMethod::Log), Some(SinkCapability::VARIADIC));
        assert_eq!(SinkCapabilities::empty().get(SinkMethod::Log), None);
    }
}
