//! DLP agent service host.
//!
//! Registers with the Windows service control manager, walks the service
//! lifecycle and blocks until a stop or shutdown control arrives. Started
//! from a console instead of the SCM it logs a note and exits with the
//! dispatcher error code.

#[cfg(windows)]
use std::path::Path;
#[cfg(windows)]
use std::sync::{Arc, OnceLock};

#[cfg(windows)]
use tracing::{error, info};
#[cfg(windows)]
use windows_service::{
    define_windows_service,
    service::{
        ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
        ServiceType,
    },
    service_control_handler::{self, ServiceControlHandlerResult, ServiceStatusHandle},
    service_dispatcher,
};

#[cfg(windows)]
use dlp_agent::lifecycle::{self, StopTrigger};
#[cfg(windows)]
use dlp_agent::logging;
#[cfg(windows)]
use dlp_agent::service_helpers::config;
#[cfg(windows)]
use dlp_agent::status::{AcceptedControls, RunState, StatusReport, StatusReporter, StatusSink};

#[cfg(windows)]
const SERVICE_TYPE: ServiceType = ServiceType::OWN_PROCESS;

#[cfg(windows)]
define_windows_service!(ffi_service_main, service_main);

#[cfg(windows)]
fn service_main(_arguments: Vec<std::ffi::OsString>) {
    if let Err(e) = run_service() {
        error!("service failed: {:?}", e);
    }
}

#[cfg(windows)]
fn run_service() -> windows_service::Result<()> {
    let reporter = StatusReporter::new();
    let stop: Arc<OnceLock<StopTrigger>> = Arc::new(OnceLock::new());

    let handler_reporter = reporter.clone();
    let handler_stop = Arc::clone(&stop);
    let event_handler = move |control_event| -> ServiceControlHandlerResult {
        match control_event {
            ServiceControl::Stop | ServiceControl::Shutdown => {
                lifecycle::request_stop(&handler_reporter, &handler_stop);
                ServiceControlHandlerResult::NoError
            }
            // Anything else is acknowledged and ignored.
            _ => ServiceControlHandlerResult::NoError,
        }
    };

    // A registration failure exits before any status is published; the SCM
    // observes the process exit instead.
    let status_handle = service_control_handler::register(config::SERVICE_NAME, event_handler)?;
    reporter.attach(ScmSink::new(status_handle));

    lifecycle::run(&reporter, &stop, || Ok(lifecycle::stop_signal()));
    Ok(())
}

/// Forwards status reports to the service control manager. Notification is
/// fire-and-forget.
#[cfg(windows)]
struct ScmSink {
    handle: ServiceStatusHandle,
}

#[cfg(windows)]
impl ScmSink {
    fn new(handle: ServiceStatusHandle) -> Self {
        Self { handle }
    }
}

#[cfg(windows)]
impl StatusSink for ScmSink {
    fn publish(&self, report: &StatusReport) {
        let _ = self.handle.set_service_status(ServiceStatus {
            service_type: SERVICE_TYPE,
            current_state: scm_state(report.state),
            controls_accepted: scm_controls(report.controls),
            exit_code: ServiceExitCode::Win32(report.exit_code),
            checkpoint: report.checkpoint,
            wait_hint: report.wait_hint,
            process_id: None,
        });
    }
}

#[cfg(windows)]
fn scm_state(state: RunState) -> ServiceState {
    match state {
        RunState::StartPending => ServiceState::StartPending,
        RunState::Running => ServiceState::Running,
        RunState::StopPending => ServiceState::StopPending,
        RunState::Stopped => ServiceState::Stopped,
    }
}

#[cfg(windows)]
fn scm_controls(controls: AcceptedControls) -> ServiceControlAccept {
    let mut accepted = ServiceControlAccept::empty();
    if controls.stop {
        accepted |= ServiceControlAccept::STOP;
    }
    if controls.shutdown {
        accepted |= ServiceControlAccept::SHUTDOWN;
    }
    accepted
}

#[cfg(windows)]
fn dispatcher_error_code(err: &windows_service::Error) -> u32 {
    match err {
        windows_service::Error::Winapi(io_err) => {
            io_err.raw_os_error().map(|code| code as u32).unwrap_or(1)
        }
        _ => 1,
    }
}

#[cfg(windows)]
fn main() {
    let _guard = logging::init_file_logging(Path::new(config::LOG_DIR));

    if let Err(e) = service_dispatcher::start(config::SERVICE_NAME, ffi_service_main) {
        let code = dispatcher_error_code(&e);
        if lifecycle::is_console_launch(code) {
            info!("started from a console; install the service and start it through the SCM");
        } else {
            error!("service dispatcher failed: {}", code);
        }
        std::process::exit(code as i32);
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("The DLP agent service only runs on Windows.");
    std::process::exit(1);
}
