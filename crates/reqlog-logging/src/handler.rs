//! Record handlers (sinks)
//!
//! A handler decides whether a level is enabled and turns a record into
//! bytes on its writer. Two encodings are provided:
//!
//! - `JsonHandler`: one JSON object per line, every attribute at the top level
//! - `TextHandler`: one logfmt-style `key=value` line per record
//!
//! `select_handler` picks between them from the deployment environment.
//! Writers are `tracing_subscriber` `MakeWriter`s; each record is encoded
//! into a buffer first and written with a single `write_all`, so records
//! from concurrent callers never interleave on a line.

mod json;
mod text;

pub use json::JsonHandler;
pub use text::TextHandler;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqlog_core_types::schema::{ENV_PRODUCTION, FIELD_LEVEL, FIELD_MSG, FIELD_TIME};
use reqlog_errors::Result;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::attr::{Attr, AttrValue};

/// Rewrites or drops an attribute before encoding. Returning `None` drops it.
///
/// Applied to the built-in `time`, `level` and `msg` fields as well as to
/// every bound and call-site attribute.
pub type ReplaceAttr = Arc<dyn Fn(Attr) -> Option<Attr> + Send + Sync>;

/// A record as handed to a handler
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: &'a str,
    pub attrs: &'a [Attr],
}

pub trait Handler: Send + Sync {
    /// Cheap level check, consulted before any record is built
    fn enabled(&self, level: Level) -> bool;

    /// Encode and write one record
    fn handle(&self, record: &Record<'_>) -> Result<()>;
}

#[derive(Clone)]
pub struct HandlerOptions {
    pub min_level: LevelFilter,
    pub replace_attr: Option<ReplaceAttr>,
}

impl HandlerOptions {
    pub fn new(min_level: LevelFilter) -> Self {
        Self {
            min_level,
            replace_attr: None,
        }
    }

    pub fn with_replace_attr<F>(mut self, replace: F) -> Self
    where
        F: Fn(Attr) -> Option<Attr> + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(replace));
        self
    }

    pub(crate) fn enabled(&self, level: Level) -> bool {
        level <= self.min_level
    }

    /// Built-in fields followed by record attributes, after rewriting
    pub(crate) fn resolve_fields(&self, record: &Record<'_>) -> Vec<Attr> {
        let fields = [
            Attr::new(FIELD_TIME, AttrValue::Time(record.time)),
            Attr::new(FIELD_LEVEL, record.level.as_str()),
            Attr::new(FIELD_MSG, record.message),
        ]
        .into_iter()
        .chain(record.attrs.iter().cloned());

        match &self.replace_attr {
            Some(replace) => fields.filter_map(|attr| replace(attr)).collect(),
            None => fields.collect(),
        }
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self::new(LevelFilter::INFO)
    }
}

impl std::fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("min_level", &self.min_level)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

/// Drops the `time` field; installed on the non-production text handler
pub fn drop_time(attr: Attr) -> Option<Attr> {
    if attr.key == FIELD_TIME {
        None
    } else {
        Some(attr)
    }
}

/// Choose the handler for a deployment environment
///
/// `"production"` gets JSON lines with timestamps. Every other environment
/// gets human-readable text with the `time` field removed.
pub fn select_handler<W>(environment: &str, min_level: LevelFilter, writer: W) -> Arc<dyn Handler>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let options = HandlerOptions::new(min_level);
    if environment == ENV_PRODUCTION {
        Arc::new(JsonHandler::new(writer, options))
    } else {
        Arc::new(TextHandler::new(writer, options.with_replace_attr(drop_time)))
    }
}
