//! Console sink abstractions
//!
//! The sink is whatever actually renders a record. It may expose any subset
//! of the `log/debug/info/warn/error` methods, and each may or may not accept
//! a variadic parameter list:
//! - `StdConsole`: stdout/stderr
//! - `NoOpConsole`: discards everything
//! - `RecordingConsole`: in-memory, configurable capabilities for tests

mod traits;
mod noop;
mod std_console;
mod recording;

pub use traits::{
    ConsoleSink, SharedConsole, SinkArgs, SinkCapabilities, SinkCapability, SinkMethod,
};
pub use noop::NoOpConsole;
pub use std_console::{render_params, StdConsole};
pub use recording::{RecordedCall, RecordingConsole};
