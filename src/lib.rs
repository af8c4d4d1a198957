//! Building blocks for the DLP agent service host.
//!
//! The service binary in `main.rs` owns the Windows-specific glue; everything
//! here is platform-neutral so the lifecycle can be exercised by the
//! integration tests on any host.

pub mod lifecycle;
pub mod logging;
pub mod service_helpers;
pub mod status;
