//! Fixed service identity. There is no runtime configuration; everything the
//! host needs to know is a constant.

/// Name the service is registered under with the service control manager.
pub const SERVICE_NAME: &str = "DlpAgentService";

pub const SERVICE_DISPLAY_NAME: &str = "DLP Agent Service";

pub const SERVICE_DESCRIPTION: &str = "Endpoint agent host for data loss prevention policies.";

/// File name of the service binary, expected next to the helper executables.
pub const SERVICE_EXE: &str = "dlp-agent.exe";

/// Directory the agent log is written to.
pub const LOG_DIR: &str = r"C:\DLP";
