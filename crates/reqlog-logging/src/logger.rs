//! The logger wrapper
//!
//! A `Logger` is an immutable value: a shared handler plus the attributes
//! bound so far. Every `with_*` call returns a new logger with a fresh
//! attribute list and leaves the receiver untouched, so loggers can be
//! cloned into threads and derived from concurrently without locking.

use std::sync::Arc;

use chrono::Utc;
use reqlog_core_types::schema::{FIELD_COMPONENT, FIELD_OPERATION, FIELD_REQUEST_ID};
use reqlog_core_types::{IdGenerator, UuidV7Ids};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use crate::attr::{upsert, Attr};
use crate::context::{self, Context};
use crate::enrich::{ExitHandler, ProcessExit};
use crate::handler::{select_handler, Handler, Record};

/// Diagnostics target for records the handler failed to write
pub const SINK_TARGET: &str = "reqlog::sink";

#[derive(Clone)]
pub struct Logger {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) attrs: Arc<[Attr]>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) exit: Arc<dyn ExitHandler>,
}

impl Logger {
    /// Base logger on stdout, encoding chosen by `environment`
    ///
    /// See [`select_handler`] for the encoding rules.
    pub fn new(environment: &str, min_level: LevelFilter) -> Self {
        Self::builder(environment, min_level).build()
    }

    pub fn builder(environment: impl Into<String>, min_level: LevelFilter) -> LoggerBuilder {
        LoggerBuilder::new(environment, min_level)
    }

    /// Logger over an explicit handler, with default id generation and exit
    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            attrs: Arc::from(Vec::new()),
            ids: Arc::new(UuidV7Ids),
            exit: Arc::new(ProcessExit),
        }
    }

    pub fn with_component(&self, name: impl Into<String>) -> Self {
        self.with_attrs([Attr::string(FIELD_COMPONENT, name)])
    }

    pub fn with_operation(&self, name: impl Into<String>) -> Self {
        self.with_attrs([Attr::string(FIELD_OPERATION, name)])
    }

    /// Bind arbitrary attributes; a key already bound by an ancestor is
    /// replaced in the new logger only
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut bound = self.attrs.to_vec();
        for attr in attrs {
            upsert(&mut bound, attr);
        }
        Self {
            handler: Arc::clone(&self.handler),
            attrs: Arc::from(bound),
            ids: Arc::clone(&self.ids),
            exit: Arc::clone(&self.exit),
        }
    }

    /// Start a request scope
    ///
    /// Generates a fresh request id and returns a context carrying it along
    /// with a logger that has `request_id` bound to the same value.
    pub fn with_request_id(&self, ctx: &Context) -> (Context, Logger) {
        let id = self.ids.next_id();
        let logger = self.with_attrs([Attr::string(FIELD_REQUEST_ID, id.as_str())]);
        (context::with_request_id(ctx, id), logger)
    }

    /// Attributes bound so far, in binding order
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    pub fn log(&self, level: Level, msg: &str, attrs: &[Attr]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, msg, attrs.to_vec());
    }

    pub fn debug(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::DEBUG, msg, attrs);
    }

    pub fn info(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::INFO, msg, attrs);
    }

    pub fn warn(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::WARN, msg, attrs);
    }

    /// Write one record. Callers have already checked `enabled`.
    ///
    /// Handler failures never reach the caller; they are reported once on
    /// the `reqlog::sink` diagnostics target and the record is dropped.
    pub(crate) fn emit(&self, level: Level, msg: &str, extra: Vec<Attr>) {
        let mut fields = self.attrs.to_vec();
        fields.reserve(extra.len());
        for attr in extra {
            upsert(&mut fields, attr);
        }

        let record = Record {
            time: Utc::now(),
            level,
            message: msg,
            attrs: &fields,
        };

        if let Err(err) = self.handler.handle(&record) {
            tracing::warn!(
                target: SINK_TARGET,
                error = %err,
                err_code = err.code(),
                level = %level,
                dropped_msg = msg,
                "log record dropped"
            );
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

/// Assembles a base logger
///
/// ```
/// use reqlog_logging::capture::{CaptureWriter, SequentialIds};
/// use reqlog_logging::{Logger, LevelFilter};
///
/// let capture = CaptureWriter::new();
/// let logger = Logger::builder("production", LevelFilter::DEBUG)
///     .writer(capture.clone())
///     .id_generator(SequentialIds::new("req"))
///     .build();
///
/// logger.info("ready", &[]);
/// assert_eq!(capture.json_lines().unwrap()[0]["msg"], "ready");
/// ```
pub struct LoggerBuilder {
    environment: String,
    min_level: LevelFilter,
    writer: Option<BoxMakeWriter>,
    handler: Option<Arc<dyn Handler>>,
    ids: Arc<dyn IdGenerator>,
    exit: Arc<dyn ExitHandler>,
    attrs: Vec<Attr>,
}

impl LoggerBuilder {
    fn new(environment: impl Into<String>, min_level: LevelFilter) -> Self {
        Self {
            environment: environment.into(),
            min_level,
            writer: None,
            handler: None,
            ids: Arc::new(UuidV7Ids),
            exit: Arc::new(ProcessExit),
            attrs: Vec::new(),
        }
    }

    /// Destination for the environment-selected handler (stdout by default)
    ///
    /// Ignored when [`LoggerBuilder::handler`] is also set.
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Bypass environment-based selection entirely
    ///
    /// An explicit handler owns its own writer and takes precedence: any
    /// writer passed to [`LoggerBuilder::writer`] is not used.
    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn exit_handler(mut self, exit: impl ExitHandler + 'static) -> Self {
        self.exit = Arc::new(exit);
        self
    }

    /// Attributes bound on the base logger (service name, version, ...)
    pub fn attr(mut self, attr: Attr) -> Self {
        upsert(&mut self.attrs, attr);
        self
    }

    pub fn build(self) -> Logger {
        let handler = match self.handler {
            Some(handler) => handler,
            None => {
                let writer = self
                    .writer
                    .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));
                select_handler(&self.environment, self.min_level, writer)
            }
        };

        Logger {
            handler,
            attrs: Arc::from(self.attrs),
            ids: self.ids,
            exit: self.exit,
        }
    }
}
