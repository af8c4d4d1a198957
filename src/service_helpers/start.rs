#[cfg(windows)]
fn main() -> windows_service::Result<()> {
    use std::ffi::OsStr;
    use windows_service::service::ServiceAccess;
    use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

    use dlp_agent::service_helpers::config;

    let manager = ServiceManager::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)?;
    let service = manager.open_service(config::SERVICE_NAME, ServiceAccess::START)?;
    service.start(&[OsStr::new("")])?;
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("Service control is only supported on Windows.");
    std::process::exit(1);
}
