use std::{
    fs,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::Context;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// `LEVEL: message field=value`, one event per line.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "\x1b[{}m{}\x1b[0m: ", color(level), level)?;
        } else {
            write!(writer, "{}: ", level)?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn color(level: Level) -> u8 {
    match level {
        Level::ERROR => 31,
        Level::WARN => 33,
        Level::INFO => 32,
        Level::DEBUG => 34,
        _ => 35,
    }
}

/// `RUST_LOG` when set, `info` otherwise. An explicit `level` overrides
/// the global level of either.
fn filter(level: Option<Level>) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    match level {
        Some(level) => filter.add_directive(level.into()),
        None => filter,
    }
}

/// Log to stderr (unless `console` is off) and, if given, append the same
/// lines to `log_file`.
pub fn tracing_init(
    level: Option<Level>,
    console: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    let layer_stderr = console.then(|| {
        fmt::Layer::new()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .event_format(LineFormat)
            .with_filter(filter(level))
    });
    let layer_file = match log_file {
        None => None,
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .context(format!("Failed to open log file: {:?}", path))?;
            Some(
                fmt::Layer::new()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .event_format(LineFormat)
                    .with_filter(filter(level)),
            )
        }
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(layer_stderr)
            .with(layer_file),
    )?;
    Ok(())
}
