//! Tracing setup for the `fincalc` binary.
//!
//! Reports are written to stdout, so diagnostics go to stderr. A second
//! layer appends to a log file once [`enable_file_logging`] has opened one.
//! Both layers sit under a single level filter that can be swapped at
//! runtime from the interactive session.

use std::{
    fmt,
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{Event, Level, Subscriber, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Used when neither `RUST_LOG` nor the caller supplies a usable directive.
const FALLBACK_DIRECTIVE: &str = "warn";

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// `14:03:27.512  WARN fincalc_core::calculations::loan: message key=value`
struct CalcLogFormat;

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

impl<S, N> FormatEvent<S, N> for CalcLogFormat
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
        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            let color = level_color(meta.level());
            write!(
                writer,
                "{DIM}{time}{RESET} {color}{:>5}{RESET} {CYAN}{}{RESET}: ",
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{time} {:>5} {}: ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Optional log file shared between the file layer and
/// [`enable_file_logging`]. Records are dropped while it is empty.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

type ReloadFn<T> = Box<dyn Fn(T) -> Result<()> + Send + Sync>;

/// Runtime handles captured by [`init_logging`].
struct LogControls {
    reload_level: ReloadFn<EnvFilter>,
    reload_console: ReloadFn<EnvFilter>,
    file: LogFile,
}

static CONTROLS: OnceLock<LogControls> = OnceLock::new();

fn controls() -> Result<&'static LogControls> {
    match CONTROLS.get() {
        Some(controls) => Ok(controls),
        None => bail!("logging not yet initialized"),
    }
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>) -> ReloadFn<EnvFilter>
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow!("log filter reload failed: {e}"))
    })
}

/// Picks the starting filter: `RUST_LOG` when it parses, then `directive`,
/// then [`FALLBACK_DIRECTIVE`]. Every rejected source is described in the
/// returned list.
fn initial_filter(
    rust_log: Option<&str>,
    directive: &str,
) -> (EnvFilter, Vec<String>) {
    let mut rejected = Vec::new();
    if let Some(env) = rust_log {
        match EnvFilter::try_new(env) {
            Ok(filter) => return (filter, rejected),
            Err(e) => rejected.push(format!("RUST_LOG '{env}': {e}")),
        }
    }
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, rejected),
        Err(e) => {
            rejected.push(format!("log level '{directive}': {e}"));
            (EnvFilter::new(FALLBACK_DIRECTIVE), rejected)
        }
    }
}

/// Installs the global subscriber with `directive` as the level filter,
/// unless `RUST_LOG` is set. Only the first call has any effect.
///
/// An unparsable directive is reported as a warning once the subscriber is
/// running.
pub fn init_logging(directive: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = initial_filter(rust_log.as_deref(), directive);

    let file = LogFile::default();
    let (level, level_handle) = reload::Layer::new(filter);
    let (console_gate, console_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let console = tracing_subscriber::fmt::layer()
        .event_format(CalcLogFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);
    let to_file = tracing_subscriber::fmt::layer()
        .event_format(CalcLogFormat)
        .with_writer(file.clone())
        .with_ansi(false);

    let installed = tracing_subscriber::registry()
        .with(level)
        .with(console)
        .with(to_file)
        .try_init();
    if installed.is_ok() {
        let _ = CONTROLS.set(LogControls {
            reload_level: reloader(level_handle),
            reload_console: reloader(console_handle),
            file,
        });
        for problem in &rejected {
            warn!(fallback = FALLBACK_DIRECTIVE, "ignoring invalid {problem}");
        }
    }
}

/// Replaces the level filter. Takes a bare level such as `debug` or a full
/// `EnvFilter` directive such as `fincalc_core=trace`.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow!("invalid log level '{directive}': {e}"))?;
    (controls()?.reload_level)(filter)
}

/// Turns stderr log output on or off. The log file is unaffected.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
    (controls()?.reload_console)(gate)
}

/// Appends log records to `path`, closing any previously opened log file.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let controls = controls()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    *controls.file.lock() = Some(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn valid_directive_is_used_as_is() {
        let (filter, rejected) = initial_filter(None, "fincalc_core=debug");

        assert_eq!(filter.to_string(), "fincalc_core=debug");
        assert!(rejected.is_empty());
    }

    #[test]
    fn rust_log_wins_over_directive() {
        let (filter, rejected) = initial_filter(Some("trace"), "info");

        assert_eq!(filter.to_string(), "trace");
        assert!(rejected.is_empty());
    }

    #[test]
    fn invalid_directive_falls_back_and_is_reported() {
        let (filter, rejected) = initial_filter(None, "fincalc=loudest");

        assert_eq!(filter.to_string(), FALLBACK_DIRECTIVE);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].starts_with("log level 'fincalc=loudest'"));
    }

    #[test]
    fn invalid_rust_log_falls_through_to_directive() {
        let (filter, rejected) = initial_filter(Some("x=loudest"), "debug");

        assert_eq!(filter.to_string(), "debug");
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].starts_with("RUST_LOG 'x=loudest'"));
    }

    #[test]
    fn empty_log_file_discards_records() {
        let file = LogFile::default();
        let mut writer = file.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        writer.flush().unwrap();
    }
}
