//! Human-readable logfmt-style encoding

use std::io::Write;

use chrono::SecondsFormat;
use reqlog_errors::Result;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::{Handler, HandlerOptions, Record};
use crate::attr::{Attr, AttrValue};

/// Writes `key=value` pairs separated by spaces, one line per record
pub struct TextHandler {
    writer: BoxMakeWriter,
    options: HandlerOptions,
}

impl TextHandler {
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

impl Handler for TextHandler {
    fn enabled(&self, level: Level) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, record: &Record<'_>) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let fields = self.options.resolve_fields(record);
        let line = encode_line(&fields);

        self.writer.make_writer().write_all(line.as_bytes())?;
        Ok(())
    }
}

fn encode_line(fields: &[Attr]) -> String {
    let mut out = String::with_capacity(256);
    for (i, attr) in fields.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_quoted(&mut out, attr.key());
        out.push('=');
        push_value(&mut out, &attr.value);
    }
    out.push('\n');
    out
}

fn push_value(out: &mut String, value: &AttrValue) {
    match value {
        AttrValue::String(s) => push_quoted(out, s),
        AttrValue::Int(n) => out.push_str(&n.to_string()),
        AttrValue::Uint(n) => out.push_str(&n.to_string()),
        AttrValue::Float(n) => out.push_str(&n.to_string()),
        AttrValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        AttrValue::Duration(d) => out.push_str(&format!("{d:?}")),
        AttrValue::Time(t) => out.push_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        AttrValue::Json(v) => push_quoted(out, &v.to_string()),
    }
}

fn push_quoted(out: &mut String, s: &str) {
    if needs_quoting(s) {
        push_escaped(out, s);
    } else {
        out.push_str(s);
    }
}

/// Double-quoted with the escapes Go's `strconv.Quote` emits, so logfmt
/// readers can unquote values. Printable characters, including non-ASCII
/// marks, are kept verbatim.
fn push_escaped(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            ' ' => out.push(' '),
            c if c.is_control() || c.is_whitespace() => {
                let code = u32::from(c);
                if code < 0x80 {
                    out.push_str(&format!("\\x{code:02x}"));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    out.push_str(&format!("\\U{code:08x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureWriter;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use tracing::level_filters::LevelFilter;

    fn emit(options: HandlerOptions, message: &str, attrs: &[Attr]) -> String {
        let capture = CaptureWriter::new();
        let handler = TextHandler::new(capture.clone(), options);
        handler
            .handle(&Record {
                time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
                level: Level::INFO,
                message,
                attrs,
            })
            .unwrap();
        capture.output()
    }

    #[test]
    fn test_plain_line() {
        let line = emit(
            HandlerOptions::new(LevelFilter::DEBUG),
            "started",
            &[Attr::new("component", "uploader"), Attr::new("workers", 4i64)],
        );
        assert_eq!(
            line,
            "time=2024-05-01T12:30:00.000Z level=INFO msg=started component=uploader workers=4\n"
        );
    }

    #[test]
    fn test_quoting() {
        let line = emit(
            HandlerOptions::new(LevelFilter::DEBUG).with_replace_attr(super::super::drop_time),
            "upload failed",
            &[
                Attr::new("error", "bucket \"avatars\" missing"),
                Attr::new("empty", ""),
                Attr::new("expr", "a=b"),
            ],
        );
        assert_eq!(
            line,
            "level=INFO msg=\"upload failed\" error=\"bucket \\\"avatars\\\" missing\" empty=\"\" expr=\"a=b\"\n"
        );
    }

    #[test]
    fn test_multiline_value_is_escaped_onto_one_line() {
        let line = emit(
            HandlerOptions::default(),
            "boom",
            &[Attr::new("stack", "frame 1\nframe 2")],
        );
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains("stack=\"frame 1\\nframe 2\""));
    }

    #[test]
    fn test_duration_is_human_readable() {
        let line = emit(
            HandlerOptions::default(),
            "resize completed",
            &[Attr::duration("duration", Duration::from_millis(50))],
        );
        assert!(line.contains("duration=50ms"), "{line}");
    }

    #[test]
    fn test_escapes_are_go_unquotable() {
        let line = emit(
            HandlerOptions::new(LevelFilter::DEBUG).with_replace_attr(super::super::drop_time),
            "colors",
            &[
                Attr::new("esc", "\x1b[31mred"),
                Attr::new("mark", "e\u{301} x"),
                Attr::new("nbsp", "a\u{a0}b"),
                Attr::new("path", "C:\\tmp dir"),
            ],
        );
        assert_eq!(
            line,
            "level=INFO msg=colors esc=\"\\x1b[31mred\" mark=\"e\u{301} x\" nbsp=\"a\\u00a0b\" path=\"C:\\\\tmp dir\"\n"
        );
    }

    #[test]
    fn test_escape_forms() {
        let mut out = String::new();
        push_escaped(&mut out, "\u{7f}\u{85}\u{7}\u{b}");
        assert_eq!(out, "\"\\x7f\\u0085\\a\\v\"");
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting(""));
        assert!(needs_quoting("a b"));
        assert!(needs_quoting("tab\there"));
        assert!(!needs_quoting("uploader"));
        assert!(!needs_quoting("0195f3c2-7a7e-7c1b-b6a4-3f1c2d9e8a10"));
    }
}
