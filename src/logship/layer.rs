//! `tracing` layer that feeds the log buffer.

use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};

use super::LogBuffer;

/// Target used by the shipper for its own diagnostics. Events with this
/// target go to the console only, never into the buffer they are about.
pub const SHIPPER_TARGET: &str = "log_shipper";

pub struct BufferLayer {
    buffer: LogBuffer,
}

impl BufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for BufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() == SHIPPER_TARGET {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        self.buffer
            .push(format_line(Local::now(), meta.level(), &visitor.finish()));
    }
}

/// `2025-01-31 14:02:11,093 [INFO] message key=value`, newline-terminated.
pub fn format_line(ts: DateTime<Local>, level: &Level, message: &str) -> String {
    format!(
        "{} [{}] {}\n",
        ts.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(mut self) -> String {
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(f: impl FnOnce()) -> Vec<String> {
        let buffer = LogBuffer::new(100);
        let subscriber = tracing_subscriber::registry().with(BufferLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, f);
        buffer.drain()
    }

    #[test]
    fn formats_timestamp_level_and_message() {
        let ts = Local
            .with_ymd_and_hms(2025, 1, 31, 14, 2, 11)
            .unwrap();
        assert_eq!(
            format_line(ts, &Level::WARN, "Todo ID 9 not found for update"),
            "2025-01-31 14:02:11,000 [WARN] Todo ID 9 not found for update\n"
        );
    }

    #[test]
    fn events_become_buffered_lines() {
        let lines = capture(|| {
            tracing::info!("Retrieved {} todos", 3);
            tracing::warn!(id = 7, "Todo ID 7 not found for deletion");
        });

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" [INFO] Retrieved 3 todos\n"));
        assert!(lines[1].ends_with(" [WARN] Todo ID 7 not found for deletion id=7\n"));
    }

    #[test]
    fn shipper_events_are_skipped() {
        let lines = capture(|| {
            tracing::warn!(target: SHIPPER_TARGET, "Failed to push logs");
            tracing::info!("kept");
        });

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("kept"));
    }
}
