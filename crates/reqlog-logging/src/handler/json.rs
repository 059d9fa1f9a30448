//! Line-delimited JSON encoding

use std::io::Write;

use chrono::SecondsFormat;
use reqlog_errors::Result;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::{Handler, HandlerOptions, Record};
use crate::attr::{Attr, AttrValue};

/// Writes one JSON object per record, attributes flattened to the top level
pub struct JsonHandler {
    writer: BoxMakeWriter,
    options: HandlerOptions,
}

impl JsonHandler {
    pub fn new<W>(writer: W, options: HandlerOptions) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self {
            writer: BoxMakeWriter::new(writer),
            options,
        }
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, level: Level) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, record: &Record<'_>) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let fields = self.options.resolve_fields(record);
        let mut buf = Vec::with_capacity(256);
        encode_line(&fields, &mut buf)?;

        self.writer.make_writer().write_all(&buf)?;
        Ok(())
    }
}

fn encode_line(fields: &[Attr], buf: &mut Vec<u8>) -> Result<()> {
    buf.push(b'{');
    for (i, attr) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        serde_json::to_writer(&mut *buf, attr.key())?;
        buf.push(b':');
        encode_value(&attr.value, buf)?;
    }
    buf.extend_from_slice(b"}\n");
    Ok(())
}

fn encode_value(value: &AttrValue, buf: &mut Vec<u8>) -> Result<()> {
    match value {
        AttrValue::String(s) => serde_json::to_writer(&mut *buf, s)?,
        AttrValue::Int(n) => serde_json::to_writer(&mut *buf, n)?,
        AttrValue::Uint(n) => serde_json::to_writer(&mut *buf, n)?,
        // NaN and infinities encode as null
        AttrValue::Float(n) => serde_json::to_writer(&mut *buf, n)?,
        AttrValue::Bool(b) => serde_json::to_writer(&mut *buf, b)?,
        // nanoseconds, saturating
        AttrValue::Duration(d) => {
            let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
            serde_json::to_writer(&mut *buf, &nanos)?
        }
        AttrValue::Time(t) => {
            serde_json::to_writer(&mut *buf, &t.to_rfc3339_opts(SecondsFormat::Nanos, true))?
        }
        AttrValue::Json(v) => serde_json::to_writer(&mut *buf, v)?,
    }
    Ok(())
}
