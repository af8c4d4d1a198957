//! Best-effort file logging.
//!
//! The service must keep running no matter what happens to its log
//! destination, so every failure in here (directory creation, file open, a
//! subscriber already being installed) is swallowed and reported as `None`.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const LOG_FILE_PREFIX: &str = "agent";
const LOG_FILE_SUFFIX: &str = "log";

/// Routes `tracing` output to `<dir>/agent.log`, creating the directory if
/// needed. The caller keeps the returned guard alive for the lifetime of the
/// process so buffered lines are flushed on exit.
pub fn init_file_logging(dir: &Path) -> Option<WorkerGuard> {
    let _ = fs::create_dir_all(dir);

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .ok()?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .ok()?;

    Some(guard)
}
