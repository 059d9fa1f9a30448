//! Span timing at debug level

use std::borrow::Cow;
use std::time::{Duration, Instant};

use reqlog_core_types::schema::FIELD_DURATION;
use tracing::Level;

use crate::attr::Attr;
use crate::logger::Logger;

impl Logger {
    /// Emit DEBUG `"<name> completed"` with `duration` = time since `start`
    ///
    /// The caller captures `start` (usually at function entry) and calls
    /// this once per measured span.
    pub fn time_track(&self, start: Instant, name: &str, attrs: &[Attr]) {
        if !self.enabled(Level::DEBUG) {
            return;
        }
        let elapsed = start.elapsed();

        let mut extra = attrs.to_vec();
        extra.push(Attr::duration(FIELD_DURATION, elapsed));
        self.emit(Level::DEBUG, &format!("{name} completed"), extra);
    }

    /// Start a span that reports through `time_track` when dropped
    pub fn start_timer(&self, name: impl Into<Cow<'static, str>>) -> TimerGuard<'_> {
        TimerGuard {
            logger: self,
            name: name.into(),
            start: Instant::now(),
            attrs: Vec::new(),
        }
    }
}

/// Reports its span exactly once, on drop
#[must_use = "the span is reported when the guard is dropped"]
pub struct TimerGuard<'a> {
    logger: &'a Logger,
    name: Cow<'static, str>,
    start: Instant,
    attrs: Vec<Attr>,
}

impl TimerGuard<'_> {
    /// Attach an attribute to the completion record
    pub fn record(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.logger.time_track(self.start, &self.name, &self.attrs);
    }
}
