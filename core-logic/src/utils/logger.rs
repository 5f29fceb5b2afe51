use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, FormattedFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// Span field carrying the per-account correlation label, e.g. `Account 1/3`.
pub const CONTEXT_FIELD: &str = "ctx";

const CONTEXT_WIDTH: usize = 20;

pub fn setup_logger() -> Option<WorkerGuard> {
    // Create logs directory
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(env_filter());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(env_filter());

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Return guard - MUST be kept alive by caller
    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// --- Formatters ---

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

impl MessageVisitor {
    fn line(&self) -> String {
        if self.fields.is_empty() {
            self.message.clone()
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

/// Innermost span `ctx` value for the event, if any.
///
/// The correlation field must be the first field recorded on the span.
fn span_context<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let scope = ctx.event_scope()?;
    for span in scope {
        let extensions = span.extensions();
        let Some(fields) = extensions.get::<FormattedFields<N>>() else {
            continue;
        };
        if let Some(value) = parse_context(&fields.fields) {
            return Some(value);
        }
    }
    None
}

/// Extracts the `ctx` value from a span's formatted fields.
///
/// Both layers share one field formatter, so the cached text carries ANSI
/// codes whenever the console layer formatted the span first.
fn parse_context(formatted: &str) -> Option<String> {
    let plain = strip_ansi(formatted);
    plain
        .strip_prefix(CONTEXT_FIELD)
        .and_then(|rest| rest.strip_prefix('='))
        .map(|value| value.trim_matches('"').to_string())
}

/// Removes CSI escape sequences (`ESC [ ... final-byte`).
fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn level_style(level: &Level) -> (Style, &'static str) {
    match *level {
        Level::ERROR => (Style::new().fg(Color::LightRed).bold(), "ERROR"),
        Level::WARN => (Style::new().fg(Color::Yellow).bold(), "WARN "),
        Level::INFO => (Style::new().fg(Color::LightGreen), "INFO "),
        Level::DEBUG => (Style::new().fg(Color::LightBlue), "DEBUG"),
        Level::TRACE => (Style::new().fg(Color::Purple), "TRACE"),
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
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
        let mut msg_visitor = MessageVisitor::default();
        event.record(&mut msg_visitor);

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let (style, label) = level_style(event.metadata().level());
        let context = span_context(ctx)
            .map(|c| format!("[{}]", c))
            .unwrap_or_default();

        let context = format!("{:<width$}", context, width = CONTEXT_WIDTH);

        write!(
            writer,
            "[ {} ] {} {} {}",
            Color::DarkGray.paint(timestamp.to_string()),
            style.paint(label),
            Color::White.paint(context),
            msg_visitor.line()
        )?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
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
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        if let Some(context) = span_context(ctx) {
            write!(writer, "[{}] ", context)?;
        }

        let mut msg_visitor = MessageVisitor::default();
        event.record(&mut msg_visitor);
        writeln!(writer, "{}", msg_visitor.line())
    }
}
