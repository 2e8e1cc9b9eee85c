use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::Settings;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// 日志行格式：`时间 - 级别 - 消息`
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
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
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(TIME_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// 构建日志分发器
///
/// 日志以追加方式写入 `settings.log_file`，无法打开时退回到 stderr，
/// 并返回打开失败的原因。分发器只在调用方显式设置的作用域内生效
pub fn build(settings: &Settings) -> (Dispatch, Option<io::Error>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, open_error) = match open_log_file(&settings.log_file) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(e) => (BoxMakeWriter::new(io::stderr), Some(e)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(writer)
        .finish();

    (Dispatch::new(subscriber), open_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings_for(log_file: PathBuf) -> Settings {
        Settings {
            resize_factor: 0.5,
            log_file,
        }
    }

    #[test]
    fn test_log_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("screen-stitch.log");
        std::fs::write(&log_file, "previous run\n").unwrap();

        let (dispatch, open_error) = build(&settings_for(log_file.clone()));
        assert!(open_error.is_none());
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("Screenshot saved to {}", "/tmp/out.png");
            tracing::error!("No screenshots captured");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "previous run");
        assert!(lines[1].ends_with(" - INFO - Screenshot saved to /tmp/out.png"));
        assert!(lines[2].ends_with(" - ERROR - No screenshots captured"));
    }

    #[test]
    fn test_timestamp_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("screen-stitch.log");

        let (dispatch, _) = build(&settings_for(log_file.clone()));
        tracing::dispatcher::with_default(&dispatch, || tracing::info!("hello"));

        let content = std::fs::read_to_string(&log_file).unwrap();
        let (timestamp, rest) = content.trim_end().split_once(" - ").unwrap();
        assert_eq!(rest, "INFO - hello");
        let (seconds, millis) = timestamp.split_once(',').unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(seconds, "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(millis.len(), 3);
    }

    #[test]
    fn test_unwritable_log_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("missing").join("screen-stitch.log");

        let (_, open_error) = build(&settings_for(log_file.clone()));
        assert!(open_error.is_some());
        assert!(!log_file.exists());
    }
}
