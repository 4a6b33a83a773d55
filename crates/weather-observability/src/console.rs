//! Console formatter matching the logging façade's fixed palette: DEBUG
//! cyan, INFO green, WARNING yellow, ERROR red, CRITICAL bold red.
//! `tracing` has no CRITICAL level; callers signal it by logging an error
//! event with a `critical = true` field (see `crate::critical!`).

use std::fmt;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const RESET: &str = "\x1b[0m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BOLD_RED: &str = "\x1b[1;31m";

pub struct ColoredLevelFormatter;

impl<S, N> FormatEvent<S, N> for ColoredLevelFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &tracing::Event<'_>) -> fmt::Result {
        let metadata = event.metadata();
        let is_critical = event_has_critical_field(event);
        let (color, label) = level_style(*metadata.level(), is_critical);

        write!(writer, "{color}{label:<8}{RESET} ")?;
        write!(writer, "{} ", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))?;
        write!(writer, "{}: ", metadata.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_style(level: Level, critical: bool) -> (&'static str, &'static str) {
    if critical {
        return (BOLD_RED, "CRITICAL");
    }
    match level {
        Level::TRACE | Level::DEBUG => (CYAN, "DEBUG"),
        Level::INFO => (GREEN, "INFO"),
        Level::WARN => (YELLOW, "WARNING"),
        Level::ERROR => (RED, "ERROR"),
    }
}

fn event_has_critical_field(event: &tracing::Event<'_>) -> bool {
    struct CriticalVisitor(bool);
    impl tracing::field::Visit for CriticalVisitor {
        fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
            if field.name() == "critical" && value {
                self.0 = true;
            }
        }
        fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn fmt::Debug) {}
    }
    let mut visitor = CriticalVisitor(false);
    event.record(&mut visitor);
    visitor.0
}

/// Logs an ERROR-level event that the console/file sinks render with the
/// CRITICAL palette entry.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)*) => {
        tracing::error!(critical = true, $($arg)*)
    };
}
