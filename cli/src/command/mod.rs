mod control;
mod generate;
mod install;
mod logs;
mod new;
mod restart;
mod run;
mod show;
mod start;
mod status;
mod stop;
mod uninstall;

pub use control::Control;
pub use generate::Generate;
pub use install::Install;
pub use logs::Logs;
pub use new::New;
pub use restart::Restart;
pub use run::Run;
pub use show::Show;
pub use start::Start;
pub use status::Status;
pub use stop::Stop;
pub use uninstall::Uninstall;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use svclib::{platform, Service, ServiceConfig, SystemdService};

use crate::supervisor::Supervisor;

pub(crate) fn load_config(path: &Path) -> Result<ServiceConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read service definition: {}", path.display()))?;
    let config: ServiceConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse service definition: {}", path.display()))?;
    Ok(config)
}

/// Controller for the host's init system.
pub(crate) fn open_service(path: &Path) -> Result<Box<dyn Service>> {
    let config = load_config(path)?;
    let supervisor = Supervisor::new(&config);
    platform::new_service(supervisor, config)
        .with_context(|| format!("Failed to load service from {}", path.display()))
}

/// Systemd controller regardless of the running init system, for commands
/// that only render or read.
pub(crate) fn open_systemd(path: &Path) -> Result<SystemdService> {
    let config = load_config(path)?;
    let supervisor = Supervisor::new(&config);
    SystemdService::new(supervisor, config)
        .with_context(|| format!("Failed to load service from {}", path.display()))
}
