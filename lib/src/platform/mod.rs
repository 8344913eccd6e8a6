#[cfg(target_os = "linux")]
mod linux;

use crate::error::{Error, Result};
use crate::{Interface, Service, ServiceConfig, SystemdService};
use std::path::PathBuf;

#[cfg(target_os = "linux")]
pub use linux::is_systemd;

#[cfg(not(target_os = "linux"))]
pub fn is_systemd() -> bool {
    false
}

/// Build the controller for the init system running on this host.
pub fn new_service(
    interface: impl Interface + 'static,
    config: ServiceConfig,
) -> Result<Box<dyn Service>> {
    if is_systemd() {
        return Ok(Box::new(SystemdService::new(interface, config)?));
    }
    Err(Error::UnsupportedPlatform)
}

/// Locate `binary` the way a shell would: absolute paths must exist, bare
/// names are looked up in `PATH` and must be executable.
pub fn find_executable(binary: &str) -> Option<PathBuf> {
    if binary.contains('/') {
        let path = PathBuf::from(binary);
        return path.exists().then_some(path);
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}
