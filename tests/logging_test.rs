use std::fs;
use std::path::PathBuf;
use std::process;

use dlp_agent::logging;
use tracing::info;

fn scratch_path(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dlp-agent-{}-{}", tag, process::id()));
    let _ = fs::remove_dir_all(&path);
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn logging_writes_to_the_agent_log() {
    let dir = scratch_path("log");

    let guard = logging::init_file_logging(&dir);
    assert!(guard.is_some());

    info!("service host says hello");
    drop(guard);

    let contents = fs::read_to_string(dir.join("agent.log")).unwrap();
    assert!(contents.contains("service host says hello"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unusable_log_directory_is_swallowed() {
    // A plain file where the log directory should be makes every step of the
    // setup fail; none of that may escape as a panic or an error.
    let blocker = scratch_path("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let dir = blocker.join("logs");
    assert!(logging::init_file_logging(&dir).is_none());

    let _ = fs::remove_file(&blocker);
}
