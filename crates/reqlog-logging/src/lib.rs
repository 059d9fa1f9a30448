//! Request-scoped structured logging for reqlog services
//!
//! This crate provides the logging façade:
//! - Handler selection by deployment environment (JSON in production,
//!   logfmt-style text elsewhere)
//! - An immutable `Logger` that accumulates bound attributes
//! - Request-id propagation through an explicit `Context`
//! - Error/Fatal helpers with conditional stack capture
//! - A timing helper for debug-level span durations
//!
//! # Usage
//!
//! ```
//! use reqlog_logging::{Context, LevelFilter, Logger};
//!
//! // Once at startup
//! let base = Logger::new("development", LevelFilter::INFO);
//!
//! // Per request
//! let (ctx, log) = base.with_component("uploader").with_request_id(&Context::background());
//! log.info("upload accepted", &[]);
//! assert!(!reqlog_logging::get_request_id(&ctx).is_empty());
//! ```
//!
//! Emission is synchronous: a record is encoded and written to the
//! configured writer before the call returns. A blocked writer blocks the
//! caller; there is no internal buffering and no flush step.

pub mod attr;
pub mod capture;
pub mod config;
pub mod context;
pub mod enrich;
pub mod handler;
pub mod init;
pub mod logger;
pub mod macros;
pub mod timing;

pub use attr::{Attr, AttrValue};
pub use config::{parse_log_level, parse_log_level_strict, report_dotenv_error, LoggingConfig};
pub use context::{get_request_id, Context};
pub use enrich::{capture_stack, ExitHandler, ProcessExit};
pub use handler::{
    select_handler, Handler, HandlerOptions, JsonHandler, Record, ReplaceAttr, TextHandler,
};
pub use init::{init, Profile};
pub use logger::{Logger, LoggerBuilder};
pub use timing::TimerGuard;

pub use reqlog_core_types::{IdGenerator, RequestId, UuidV7Ids};
pub use tracing::level_filters::LevelFilter;
pub use tracing::Level;
