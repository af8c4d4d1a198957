//! Lifecycle driver and stop signal.
//!
//! The driver walks the service through start pending, running, stop pending
//! and stopped, blocking in between on the stop signal. The control handler
//! runs on an SCM-dispatched thread and only ever posts a stop request; all
//! state progression happens on the driver's thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::{error, info};

use crate::status::{NO_ERROR, RunState, StatusReporter};

/// Wait hint handed to the service manager while a transition is in flight.
pub const PENDING_WAIT_HINT: Duration = Duration::from_millis(3000);

/// `ERROR_FAILED_SERVICE_CONTROLLER_CONNECT`: the dispatcher could not reach
/// the service control manager, i.e. the binary was started from a console.
pub const NOT_LAUNCHED_AS_SERVICE: u32 = 1063;

pub fn is_console_launch(code: u32) -> bool {
    code == NOT_LAUNCHED_AS_SERVICE
}

/// Setting side of the stop signal, held by the control handler. Fires at
/// most once per service run; later calls are no-ops.
#[derive(Debug, Clone)]
pub struct StopTrigger {
    tx: Sender<()>,
    fired: Arc<AtomicBool>,
}

impl StopTrigger {
    /// Returns whether this call actually set the signal.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = self.tx.send(());
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Blocking side of the stop signal, owned by the lifecycle driver.
#[derive(Debug)]
pub struct StopWaiter {
    rx: Receiver<()>,
}

impl StopWaiter {
    /// Blocks until the trigger fires. The sole suspension point of the
    /// service; there is no timeout, cancellation comes from outside.
    pub fn wait(&self) {
        let _ = self.rx.recv();
    }
}

/// Creates a fresh stop signal pair.
pub fn stop_signal() -> (StopTrigger, StopWaiter) {
    let (tx, rx) = mpsc::channel();
    (
        StopTrigger {
            tx,
            fired: Arc::new(AtomicBool::new(false)),
        },
        StopWaiter { rx },
    )
}

/// Handles a stop or shutdown control from the service manager.
///
/// Publishes `StopPending` strictly before firing the trigger, so the SCM
/// never learns about the stop without the stop having been announced. If the
/// stop signal does not exist yet the request is acknowledged and dropped.
pub fn request_stop(reporter: &StatusReporter, stop: &OnceLock<StopTrigger>) {
    info!("stop or shutdown control received");
    if let Some(trigger) = stop.get() {
        reporter.publish(RunState::StopPending, NO_ERROR, PENDING_WAIT_HINT);
        trigger.fire();
    }
}

/// Drives the whole service lifecycle and returns the Win32 exit code.
///
/// `make_signal` creates the stop signal; a creation failure is terminal and
/// short-circuits straight to `Stopped` with the OS error code, without ever
/// reaching `Running`. The happy path publishes the trigger into `stop` for
/// the control handler, reports `Running` and blocks until the trigger fires.
pub fn run<F>(reporter: &StatusReporter, stop: &OnceLock<StopTrigger>, make_signal: F) -> u32
where
    F: FnOnce() -> io::Result<(StopTrigger, StopWaiter)>,
{
    reporter.publish(RunState::StartPending, NO_ERROR, PENDING_WAIT_HINT);
    info!("start pending");

    let waiter = match make_signal() {
        Ok((trigger, waiter)) => {
            let _ = stop.set(trigger);
            waiter
        }
        Err(err) => {
            let code = err.raw_os_error().map(|c| c as u32).unwrap_or(1);
            error!("failed to create the stop signal: {}", err);
            reporter.publish(RunState::Stopped, code, Duration::ZERO);
            return code;
        }
    };

    // TODO: hook up policy loading, device detection and process auditing.
    info!("initialization done");

    reporter.publish(RunState::Running, NO_ERROR, Duration::ZERO);
    info!("running");

    waiter.wait();

    info!("stopping");
    reporter.publish(RunState::StopPending, NO_ERROR, PENDING_WAIT_HINT);
    drop(waiter);

    reporter.publish(RunState::Stopped, NO_ERROR, Duration::ZERO);
    info!("stopped");
    NO_ERROR
}
