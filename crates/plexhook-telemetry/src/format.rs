//! Line format understood by the downloader's script log.
//!
//! Each event is written as `[SEVERITY] PREFIX: message key=value...`.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::init::LOG_PREFIX;

/// Event formatter emitting bracketed severity markers.
#[derive(Debug, Clone, Copy)]
pub struct NzbgetFormat {
    prefix: &'static str,
}

impl NzbgetFormat {
    /// Formatter that tags every line with `prefix`.
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl Default for NzbgetFormat {
    fn default() -> Self {
        Self::new(LOG_PREFIX)
    }
}

/// Severity marker for a tracing level.
#[must_use]
pub const fn severity_marker(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DETAIL",
        Level::TRACE => "DEBUG",
    }
}

impl<S, N> FormatEvent<S, N> for NzbgetFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let marker = severity_marker(*event.metadata().level());
        write!(writer, "[{marker}] {}: ", self.prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().map(|guard| guard.clone()).unwrap_or_default();
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Ok(mut guard) = self.0.lock() {
                guard.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .event_format(NzbgetFormat::default())
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        buffer.contents()
    }

    #[test]
    fn markers_follow_downloader_conventions() {
        assert_eq!(severity_marker(Level::ERROR), "ERROR");
        assert_eq!(severity_marker(Level::WARN), "WARNING");
        assert_eq!(severity_marker(Level::INFO), "INFO");
        assert_eq!(severity_marker(Level::DEBUG), "DETAIL");
        assert_eq!(severity_marker(Level::TRACE), "DEBUG");
    }

    #[test]
    fn info_event_renders_prefixed_line() {
        let output = capture(|| tracing::info!(section = %"4", "section refresh complete"));
        assert!(output.starts_with("[INFO] PLEXHOOK: "));
        assert!(output.contains("section refresh complete"));
        assert!(output.contains("section=4"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn warn_event_uses_warning_marker() {
        let output = capture(|| tracing::warn!("client notification failed"));
        assert!(output.starts_with("[WARNING] PLEXHOOK: client notification failed"));
    }

    #[test]
    fn one_line_per_event() {
        let output = capture(|| {
            tracing::error!("first");
            tracing::debug!("second");
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec!["[ERROR] PLEXHOOK: first", "[DETAIL] PLEXHOOK: second"]
        );
    }
}
