use std::fs;
use std::path::Path;

/// Whether systemd is the running init system.
pub fn is_systemd() -> bool {
    if Path::new("/run/systemd/system").exists() {
        return true;
    }
    if super::find_executable("systemctl").is_none() {
        return false;
    }
    fs::read_to_string("/proc/1/comm")
        .map(|comm| comm.trim() == "systemd")
        .unwrap_or(false)
}
