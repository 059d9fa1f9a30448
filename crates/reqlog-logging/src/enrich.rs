//! Error and fatal paths with conditional stack capture
//!
//! Neither helper takes a `Context`: whether a level is enabled and what
//! gets emitted depend only on the logger's handler and bound attributes.

use std::backtrace::Backtrace;
use std::error::Error;

use reqlog_core_types::schema::{FIELD_ERROR, FIELD_STACK, MAX_STACK_BYTES};
use tracing::Level;

use crate::attr::Attr;
use crate::logger::Logger;

/// Status passed to the exit handler by [`Logger::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// Terminates the process on behalf of [`Logger::fatal`]
pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: i32) -> !;
}

/// Ends the process with `std::process::exit`
///
/// Destructors of live values, including pending cleanup elsewhere in the
/// process, do not run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Snapshot of the current call stack, cut to at most `max_bytes`
pub fn capture_stack(max_bytes: usize) -> String {
    let mut stack = Backtrace::force_capture().to_string();
    if stack.len() > max_bytes {
        let mut end = max_bytes;
        while !stack.is_char_boundary(end) {
            end -= 1;
        }
        stack.truncate(end);
    }
    stack
}

impl Logger {
    /// Emit an ERROR record
    ///
    /// With `err` present the record gets an `error` attribute holding its
    /// message. When debug logging is also enabled a `stack` attribute is
    /// added; the level is checked first so the capture never runs for a
    /// logger that would discard it.
    pub fn log_error(&self, msg: &str, err: Option<&dyn Error>, attrs: &[Attr]) {
        if !self.enabled(Level::ERROR) {
            return;
        }

        let mut extra = attrs.to_vec();
        if let Some(err) = err {
            extra.push(Attr::string(FIELD_ERROR, err.to_string()));
            if self.enabled(Level::DEBUG) {
                extra.push(Attr::string(FIELD_STACK, capture_stack(MAX_STACK_BYTES)));
            }
        }

        self.emit(Level::ERROR, msg, extra);
    }

    /// `log_error`, then terminate with status 1
    ///
    /// Reserved for conditions already known to be unrecoverable for the
    /// whole process. Never use for per-request failures.
    pub fn fatal(&self, msg: &str, err: Option<&dyn Error>, attrs: &[Attr]) -> ! {
        self.log_error(msg, err, attrs);
        self.exit.exit(FATAL_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureWriter, ExitRequested, RecordingExit};
    use std::io;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use tracing::level_filters::LevelFilter;

    fn logger(level: LevelFilter) -> (Logger, CaptureWriter, RecordingExit) {
        let capture = CaptureWriter::new();
        let exit = RecordingExit::new();
        let logger = Logger::builder("production", level)
            .writer(capture.clone())
            .exit_handler(exit.clone())
            .build();
        (logger, capture, exit)
    }

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "object not found")
    }

    #[test]
    fn test_capture_stack_is_bounded() {
        let stack = capture_stack(64);
        assert!(!stack.is_empty());
        assert!(stack.len() <= 64);
    }

    #[test]
    fn test_capture_stack_respects_char_boundaries() {
        for max in 0..32 {
            let stack = capture_stack(max);
            assert!(stack.len() <= max);
        }
    }

    #[test]
    fn test_error_attribute_and_no_stack_at_info() {
        let (logger, capture, _) = logger(LevelFilter::INFO);
        let err = not_found();
        logger.log_error("download failed", Some(&err), &[]);
        logger.log_error("nothing attached", None, &[]);

        let lines = capture.json_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["error"], "object not found");
        assert!(lines[0].get("stack").is_none());
        assert!(lines[1].get("error").is_none());
        assert!(lines[1].get("stack").is_none());
    }

    #[test]
    fn test_stack_only_with_error_at_debug() {
        let (logger, capture, _) = logger(LevelFilter::DEBUG);
        let err = not_found();
        logger.log_error("download failed", Some(&err), &[Attr::new("key", "a.png")]);
        logger.log_error("nothing attached", None, &[]);

        let lines = capture.json_lines().unwrap();
        let stack = lines[0]["stack"].as_str().unwrap();
        assert!(!stack.is_empty());
        assert!(stack.len() <= MAX_STACK_BYTES);
        assert_eq!(lines[0]["key"], "a.png");
        assert!(lines[1].get("stack").is_none());
    }

    #[test]
    fn test_fatal_logs_once_then_exits_with_one() {
        let (logger, capture, exit) = logger(LevelFilter::INFO);
        let err = not_found();

        let payload = catch_unwind(AssertUnwindSafe(|| {
            logger.fatal("config missing", Some(&err), &[]);
        }))
        .unwrap_err();

        assert_eq!(payload.downcast_ref::<ExitRequested>(), Some(&ExitRequested(1)));
        assert_eq!(exit.codes(), vec![1]);

        let lines = capture.json_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["msg"], "config missing");
    }
}
