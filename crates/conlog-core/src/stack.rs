//! Best-effort call-stack capture
//!
//! A capturer returns the current call stack as readable frame strings, or
//! `None` when the platform can't provide one. Capture never panics and
//! never reports an error to the caller.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::Arc;

/// Stack capture abstraction
///
/// Implementations:
/// - `BacktraceCapturer`: std's native backtrace
/// - `NoopStackCapturer`: for hosts without one, or when capture is unwanted
pub trait StackCapturer: Send + Sync {
    /// Frames of the current call stack, innermost first, excluding the
    /// capture routine itself
    fn capture(&self) -> Option<Vec<String>>;
}

/// Type alias for an Arc-wrapped capturer
pub type SharedStackCapturer = Arc<dyn StackCapturer>;

/// Capturer backed by [`std::backtrace::Backtrace`]
///
/// Capture is forced regardless of `RUST_BACKTRACE`; symbol names depend on
/// the debug info available in the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapturer;

impl BacktraceCapturer {
    /// Create a new backtrace capturer
    pub fn new() -> Self {
        Self
    }
}

impl StackCapturer for BacktraceCapturer {
    fn capture(&self) -> Option<Vec<String>> {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return None;
        }

        let mut frames = parse_frames(&backtrace.to_string());
        if frames.is_empty() {
            return None;
        }

        let own = frames.iter().take_while(|frame| is_capture_frame(frame)).count();
        // Without symbols the capture routine can't be recognized; it is the first frame
        frames.drain(..own.max(1));
        Some(frames)
    }
}

/// Frames belonging to std's backtrace machinery or to [`BacktraceCapturer`]
fn is_capture_frame(frame: &str) -> bool {
    let symbol = frame.trim_start_matches('<');
    symbol.starts_with("std::backtrace") || symbol.starts_with("conlog_core::stack::BacktraceCapturer")
}

/// Capturer that never produces a stack
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStackCapturer;

impl StackCapturer for NoopStackCapturer {
    fn capture(&self) -> Option<Vec<String>> {
        None
    }
}

/// Split a rendered backtrace into one string per frame
///
/// A frame is a numbered symbol line (`  3: crate::module::function`),
/// optionally followed by its source location line (`at src/lib.rs:10:5`),
/// which is folded into the same entry. Anything else is ignored.
pub(crate) fn parse_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();

    for line in rendered.lines() {
        let line = line.trim();
        if let Some(symbol) = frame_symbol(line) {
            let symbol = if symbol.is_empty() { "anonymous" } else { symbol };
            frames.push(symbol.to_string());
        } else if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.push_str(" at ");
                frame.push_str(location);
            }
        }
    }

    frames
}

fn frame_symbol(line: &str) -> Option<&str> {
    let (index, rest) = line.split_once(':')?;
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: conlog_core::stack::BacktraceCapturer::capture
             at ./src/stack.rs:40:25
   1: conlog_core::logger::dispatch::ConsoleLogger::build_params
             at ./src/logger/dispatch.rs:120:9
   2: app::main
   3:
note: Some details are omitted, run with `RUST_BACKTRACE=full` for a verbose backtrace.";

    #[test]
    fn test_parse_frames() {
        let frames = parse_frames(RENDERED);
        assert_eq!(frames.len(), 4);
        assert_eq!(
            frames[0],
            "conlog_core::stack::BacktraceCapturer::capture at ./src/stack.rs:40:25"
        );
        assert_eq!(frames[2], "app::main");
        assert_eq!(frames[3], "anonymous");
    }

    #[test]
    fn test_parse_ignores_noise() {
        assert!(parse_frames("disabled backtrace").is_empty());
        assert!(parse_frames("at orphan.rs:1:1").is_empty());
        assert!(parse_frames("").is_empty());
    }

    #[test]
    fn test_noop_capturer() {
        assert_eq!(NoopStackCapturer.capture(), None);
    }

    #[test]
    fn test_capture_frames_recognized() {
        assert!(is_capture_frame("std::backtrace_rs::backtrace::libunwind::trace at /rustc/x/backtrace.rs:1:1"));
        assert!(is_capture_frame("std::backtrace::Backtrace::force_capture"));
        assert!(is_capture_frame(
            "<conlog_core::stack::BacktraceCapturer as conlog_core::stack::StackCapturer>::capture"
        ));
        assert!(!is_capture_frame("conlog_core::logger::dispatch::ConsoleLogger::info"));
        assert!(!is_capture_frame("app::main"));
    }

    #[test]
    fn test_backtrace_capturer_excludes_itself() {
        if !cfg!(debug_assertions) {
            return;
        }
        let Some(frames) = BacktraceCapturer::new().capture() else {
            return;
        };
        // Symbol names need debug info
        if !frames.iter().any(|frame| frame.contains("test_backtrace_capturer_excludes_itself")) {
            return;
        }
        assert!(!frames.is_empty());
        assert!(!is_capture_frame(&frames[0]), "capture frame leaked: {}", frames[0]);
        assert!(frames[0].contains("test_backtrace_capturer_excludes_itself"), "first frame: {}", frames[0]);
    }
}
