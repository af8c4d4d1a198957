#[cfg(windows)]
fn main() -> windows_service::Result<()> {
    use windows_service::service::{ServiceAccess, ServiceState};
    use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

    use dlp_agent::service_helpers::config;

    let manager = ServiceManager::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)?;
    let service = manager.open_service(
        config::SERVICE_NAME,
        ServiceAccess::QUERY_STATUS | ServiceAccess::STOP | ServiceAccess::DELETE,
    )?;

    // Marked for deletion once this succeeds; actually removed when the
    // service is stopped and every open handle to it is closed.
    service.delete()?;
    if service.query_status()?.current_state != ServiceState::Stopped {
        service.stop()?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("Service removal is only supported on Windows.");
    std::process::exit(1);
}
