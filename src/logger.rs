//! Tracing subscriber setup.

use std::{fs::File, io, str::FromStr, sync::Mutex};

use anyhow::Context;
use time::{format_description::parse_borrowed, OffsetDateTime};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{
    fmt::{time::OffsetTime, writer::BoxMakeWriter},
    FmtSubscriber,
};

/// Default level when logging to stderr.
const DEFAULT_STDERR_LEVEL: Level = Level::WARN;

/// Install the global subscriber.
///
/// Stdout is reserved for the player, so logs go either to a timestamped file
/// (`to_file`, everything down to TRACE) or to stderr, filtered by
/// `SWEEPER_LOG_LEVEL` (`error`, `warn`, `info`, `debug` or `trace`).
pub fn init_logger(to_file: bool) -> anyhow::Result<()> {
    let (writer, level, ansi) = if to_file {
        let file_name = get_log_file_name()?;
        let file = File::create(&file_name)
            .with_context(|| format!("could not create log file '{file_name}'"))?;
        (BoxMakeWriter::new(Mutex::new(file)), Level::TRACE, false)
    } else {
        let level = stderr_level(std::env::var("SWEEPER_LOG_LEVEL").ok().as_deref());
        (BoxMakeWriter::new(io::stderr), level, true)
    };

    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(
        local_offset,
        parse_borrowed::<2>("[year]-[month]-[day] [hour]:[minute]:[second]")
            .context("invalid time format")?,
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(ansi)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).context("a global tracing subscriber is already set")
}

/// Unknown or missing level names fall back to WARN.
fn stderr_level(name: Option<&str>) -> Level {
    name.and_then(|lvl| Level::from_str(lvl).ok())
        .unwrap_or(DEFAULT_STDERR_LEVEL)
}

fn get_log_file_name() -> anyhow::Result<String> {
    let format =
        parse_borrowed::<2>("[year]-[month]-[day]_[hour]:[minute]:[second]_sweeper_log.txt")
            .context("invalid log file name format")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).context("could not format log file name")
}
