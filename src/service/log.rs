use time::format_description::OwnedFormatItem;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::LogConfig;

const DEFAULT_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Installs the global subscriber. Keep the returned guards alive for as long
/// as logs should be flushed. Installing twice is a no-op with a warning.
pub fn init_logger(config: &LogConfig) -> Vec<WorkerGuard> {
    let local_offset = time::UtcOffset::current_local_offset();
    let max_level = tracing::Level::from(config.max_level);

    let (time_format, format_err) = match time::format_description::parse(&config.time_format)
    {
        Ok(items) => (OwnedFormatItem::from(items), None),
        Err(e) => (default_time_format(), Some(e)),
    };

    let (offset, offset_err) = match local_offset {
        Ok(ofs) => (ofs, None),
        Err(e) => (time::UtcOffset::UTC, Some(e)),
    };
    let timer = OffsetTime::new(offset, time_format);

    let mut guards = vec![];

    let (s, s_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(s_guard);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_timer(timer.clone())
        .with_writer(s.with_max_level(max_level));

    let file_layer = config.log_dir.as_ref().map(|dir| {
        let file_writer = tracing_appender::rolling::daily(dir, "pp_bridge.log");
        let (f, f_guard) = tracing_appender::non_blocking(file_writer);
        guards.push(f_guard);

        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_timer(timer)
            .with_writer(f.with_max_level(max_level))
            .boxed()
    });

    let installed = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = installed {
        warn!("logger already installed: {}", e);
    }
    if let Some(e) = format_err {
        warn!("invalid log time format {:?}: {}", config.time_format, e);
    }
    if let Some(e) = offset_err {
        warn!("unable to determine local time offset: {}, using UTC", e);
    }

    guards
}

fn default_time_format() -> OwnedFormatItem {
    match time::format_description::parse(DEFAULT_TIME_FORMAT) {
        Ok(items) => OwnedFormatItem::from(items),
        Err(_) => OwnedFormatItem::Compound(Box::new([])),
    }
}
