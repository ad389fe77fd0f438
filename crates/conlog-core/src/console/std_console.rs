//! Standard output console implementation

use serde_json::Value;

use super::traits::{ConsoleSink, SinkArgs, SinkCapabilities, SinkMethod};

/// Render a parameter list as one line
///
/// Strings are written as-is, every other value as compact JSON, separated
/// by single spaces.
pub fn render_params(params: &[Value]) -> String {
    params
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A console that writes to stdout/stderr
///
/// `log`, `debug` and `info` go to stdout, `warn` and `error` to stderr.
#[derive(Debug, Clone, Default)]
pub struct StdConsole {
    prefix: Option<String>,
}

impl StdConsole {
    /// Create a new console without a prefix
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a console that prepends a fixed prefix to every line
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Line prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn format_line(&self, args: &SinkArgs) -> String {
        let body = match args {
            SinkArgs::Params(params) => render_params(params),
            SinkArgs::Message(message) => message.clone(),
        };
        match &self.prefix {
            Some(prefix) => format!("{} {}", prefix, body),
            None => body,
        }
    }
}

impl ConsoleSink for StdConsole {
    fn capabilities(&self) -> SinkCapabilities {
        SinkCapabilities::full()
    }

    fn write(&self, method: SinkMethod, args: SinkArgs) {
        let line = self.format_line(&args);
        match method {
            SinkMethod::Log | SinkMethod::Debug | SinkMethod::Info => println!("{}", line),
            SinkMethod::Warn | SinkMethod::Error => eprintln!("{}", line),
        }
    }
}
