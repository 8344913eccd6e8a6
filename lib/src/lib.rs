pub mod config;
pub mod error;
pub mod logger;
pub mod platform;
pub mod runner;
pub mod systemd;
pub mod wait;

use std::fmt;
use std::sync::mpsc::Sender;

pub use config::{ServiceConfig, SystemdOptions};
pub use error::{BoxError, Error, Result};
pub use logger::Logger;
pub use systemd::SystemdService;

/// Observed state of an installed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unknown,
    Running,
    Stopped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Unknown => "unknown",
            Status::Running => "running",
            Status::Stopped => "stopped",
        })
    }
}

/// Hooks supplied by the program being run as a service.
///
/// `start` must not block; the service keeps running until [`Service::run`]
/// is told to shut down, after which `stop` is called.
pub trait Interface: Send + Sync {
    fn start(&self, service: &dyn Service) -> Result<(), BoxError>;
    fn stop(&self, service: &dyn Service) -> Result<(), BoxError>;
}

/// A service registered with the host's init system.
pub trait Service {
    /// Call the start hook, block until shutdown is requested, then call the
    /// stop hook. A failing start hook is returned without calling stop.
    fn run(&self) -> Result<()>;
    fn start(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn restart(&self) -> Result<()>;
    fn install(&self) -> Result<()>;
    fn uninstall(&self) -> Result<()>;
    /// `Err` means the state is unknown, e.g. [`Error::NotInstalled`].
    fn status(&self) -> Result<Status>;
    /// Console logger in a terminal, system logger otherwise.
    fn logger(&self, errs: Option<Sender<Error>>) -> Result<Box<dyn Logger>>;
    fn system_logger(&self, errs: Option<Sender<Error>>) -> Result<Box<dyn Logger>>;
    fn platform(&self) -> &'static str;
    fn display_name(&self) -> &str;
}

/// Actions accepted by [`control`].
pub const CONTROL_ACTIONS: &[&str] = &["start", "stop", "restart", "install", "uninstall"];

/// Perform a named action on `service`.
pub fn control(service: &dyn Service, action: &str) -> Result<()> {
    match action {
        "start" => service.start(),
        "stop" => service.stop(),
        "restart" => service.restart(),
        "install" => service.install(),
        "uninstall" => service.uninstall(),
        _ => Err(Error::UnknownAction {
            action: action.to_string(),
        }),
    }
}
