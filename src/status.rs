//! Service status model: what the host tells the service control manager
//! about itself, and the reporter that derives each record from the current
//! lifecycle state.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Win32 success code carried by status reports and process exits.
pub const NO_ERROR: u32 = 0;

/// Lifecycle states of the service. Progression is linear
/// (`StartPending → Running → StopPending → Stopped`) with no back-edges;
/// `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    StartPending,
    Running,
    StopPending,
    Stopped,
}

impl RunState {
    /// A transition is in flight and the checkpoint must keep advancing.
    pub fn is_pending(self) -> bool {
        matches!(self, RunState::StartPending | RunState::StopPending)
    }
}

/// Control requests the service is currently willing to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedControls {
    pub stop: bool,
    pub shutdown: bool,
}

impl AcceptedControls {
    pub const NONE: Self = Self {
        stop: false,
        shutdown: false,
    };

    pub const STOP_AND_SHUTDOWN: Self = Self {
        stop: true,
        shutdown: true,
    };

    pub fn is_empty(self) -> bool {
        !(self.stop || self.shutdown)
    }
}

/// One status notification as handed to the service manager. The fixed
/// "own process" type tag is added by the Windows sink, the only place it
/// means anything.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub state: RunState,
    pub controls: AcceptedControls,
    pub exit_code: u32,
    pub checkpoint: u32,
    pub wait_hint: Duration,
}

/// Destination for status reports. The service binary forwards them to the
/// SCM through its registered handle; tests record them.
pub trait StatusSink: Send + Sync {
    fn publish(&self, report: &StatusReport);
}

/// Derives and publishes status records.
///
/// Cloning is cheap and every clone shares the same checkpoint counter and
/// sink, so the lifecycle driver and the control handler report through one
/// reporter without a lock.
#[derive(Clone)]
pub struct StatusReporter {
    inner: Arc<ReporterInner>,
}

struct ReporterInner {
    checkpoint: AtomicU32,
    sink: OnceLock<Box<dyn StatusSink>>,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                checkpoint: AtomicU32::new(0),
                sink: OnceLock::new(),
            }),
        }
    }

    /// Binds the reporter to its destination, usually right after the control
    /// handler registration yields a status handle. A second call is ignored.
    pub fn attach<S: StatusSink + 'static>(&self, sink: S) {
        let _ = self.inner.sink.set(Box::new(sink));
    }

    /// Publishes `state` with the accepted controls and checkpoint derived
    /// from it: nothing is accepted while start is pending, stop and shutdown
    /// afterwards; the checkpoint advances through pending states and resets
    /// to zero on reaching `Running` or `Stopped`.
    ///
    /// Publishing before `attach` keeps the checkpoint bookkeeping but drops
    /// the report; it never faults. Sink failures are not surfaced either,
    /// status notification is fire-and-forget.
    pub fn publish(&self, state: RunState, exit_code: u32, wait_hint: Duration) {
        let controls = if state == RunState::StartPending {
            AcceptedControls::NONE
        } else {
            AcceptedControls::STOP_AND_SHUTDOWN
        };

        let checkpoint = if state.is_pending() {
            self.inner.checkpoint.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.inner.checkpoint.store(0, Ordering::SeqCst);
            0
        };

        if let Some(sink) = self.inner.sink.get() {
            sink.publish(&StatusReport {
                state,
                controls,
                exit_code,
                checkpoint,
                wait_hint,
            });
        }
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}
