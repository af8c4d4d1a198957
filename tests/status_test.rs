use std::sync::{Arc, Mutex};
use std::time::Duration;

use dlp_agent::status::{
    AcceptedControls, NO_ERROR, RunState, StatusReport, StatusReporter, StatusSink,
};

#[derive(Clone, Default)]
struct RecordingSink {
    reports: Arc<Mutex<Vec<StatusReport>>>,
}

impl RecordingSink {
    fn reports(&self) -> Vec<StatusReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, report: &StatusReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

fn reporter_with_sink() -> (StatusReporter, RecordingSink) {
    let reporter = StatusReporter::new();
    let sink = RecordingSink::default();
    reporter.attach(sink.clone());
    (reporter, sink)
}

// --- accepted controls ---

#[test]
fn start_pending_accepts_nothing() {
    let (reporter, sink) = reporter_with_sink();
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].controls, AcceptedControls::NONE);
    assert!(reports[0].controls.is_empty());
}

#[test]
fn every_other_state_accepts_stop_and_shutdown() {
    let (reporter, sink) = reporter_with_sink();
    reporter.publish(RunState::Running, NO_ERROR, Duration::ZERO);
    reporter.publish(RunState::StopPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::Stopped, NO_ERROR, Duration::ZERO);

    for report in sink.reports() {
        assert_eq!(report.controls, AcceptedControls::STOP_AND_SHUTDOWN);
    }
}

// --- checkpoint policy ---

#[test]
fn checkpoint_advances_while_pending() {
    let (reporter, sink) = reporter_with_sink();
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));

    let checkpoints: Vec<u32> = sink.reports().iter().map(|r| r.checkpoint).collect();
    assert_eq!(checkpoints, [1, 2, 3]);
}

#[test]
fn checkpoint_resets_on_stable_states() {
    let (reporter, sink) = reporter_with_sink();
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::Running, NO_ERROR, Duration::ZERO);
    reporter.publish(RunState::StopPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::StopPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::Stopped, NO_ERROR, Duration::ZERO);

    let checkpoints: Vec<u32> = sink.reports().iter().map(|r| r.checkpoint).collect();
    assert_eq!(checkpoints, [1, 0, 1, 2, 0]);
}

// --- sink binding ---

#[test]
fn publish_before_attach_is_dropped_not_a_fault() {
    let reporter = StatusReporter::new();
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));

    let sink = RecordingSink::default();
    reporter.attach(sink.clone());
    reporter.publish(RunState::Running, NO_ERROR, Duration::ZERO);

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].state, RunState::Running);
}

#[test]
fn exit_code_and_wait_hint_pass_through() {
    let (reporter, sink) = reporter_with_sink();
    reporter.publish(RunState::StartPending, NO_ERROR, Duration::from_millis(3000));
    reporter.publish(RunState::Stopped, 1450, Duration::ZERO);

    let reports = sink.reports();
    assert_eq!(reports[0].wait_hint, Duration::from_millis(3000));
    assert_eq!(reports[1].exit_code, 1450);
    assert_eq!(reports[1].wait_hint, Duration::ZERO);
}
