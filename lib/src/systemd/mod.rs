//! The systemd backend.
//!
//! Every operation derives the unit path and queries `systemctl` afresh;
//! nothing is cached between calls. Concurrent operations on the same unit
//! are serialized by systemd itself, not by this type.

pub mod probe;
pub mod status;
pub mod template;
pub mod unit;

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::logger::{self, ConsoleLogger, Logger, SysLogger};
use crate::runner::{CommandOutput, CommandRunner, SystemRunner};
use crate::wait::{RunWait, SignalWait};
use crate::{Interface, Service, Status};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::Sender;
use template::{UnitContext, UnitTemplate};
use tracing::{debug, info};

pub const PLATFORM: &str = "linux-systemd";

/// Where unit files live on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLayout {
    pub system_dir: PathBuf,
    pub home_dir: Option<PathBuf>,
}

impl UnitLayout {
    pub fn host() -> Self {
        Self {
            system_dir: PathBuf::from("/etc/systemd/system"),
            home_dir: dirs::home_dir(),
        }
    }

    pub fn user_dir(&self) -> Result<PathBuf> {
        let home = self.home_dir.as_ref().ok_or(Error::HomeDirUnavailable)?;
        Ok(home.join(".config/systemd/user"))
    }

    /// Path of the unit file for `name`. Performs no I/O.
    pub fn unit_path(&self, name: &str, user: bool) -> Result<PathBuf> {
        let dir = if user {
            self.user_dir()?
        } else {
            self.system_dir.clone()
        };
        Ok(dir.join(unit_name(name)))
    }
}

impl Default for UnitLayout {
    fn default() -> Self {
        Self::host()
    }
}

pub fn unit_name(name: &str) -> String {
    format!("{}.service", name)
}

/// Controls one service through systemd.
pub struct SystemdService {
    interface: Box<dyn Interface>,
    config: ServiceConfig,
    template: UnitTemplate,
    runner: Box<dyn CommandRunner>,
    layout: UnitLayout,
    run_wait: Box<dyn RunWait>,
}

impl SystemdService {
    /// Validate the configuration and compile the unit template. No
    /// commands are run and nothing is written.
    pub fn new(interface: impl Interface + 'static, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let template = UnitTemplate::new(config.options.custom_template())?;
        Ok(Self {
            interface: Box::new(interface),
            config,
            template,
            runner: Box::new(SystemRunner),
            layout: UnitLayout::host(),
            run_wait: Box::new(SignalWait),
        })
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_layout(mut self, layout: UnitLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the default wait-for-signal behaviour of [`Service::run`].
    pub fn with_run_wait(mut self, wait: impl RunWait + 'static) -> Self {
        self.run_wait = Box::new(wait);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn unit_name(&self) -> String {
        unit_name(&self.config.name)
    }

    pub fn is_user_service(&self) -> bool {
        self.config.options.user_service
    }

    pub fn unit_path(&self) -> Result<PathBuf> {
        self.layout.unit_path(&self.config.name, self.is_user_service())
    }

    /// Like [`unit_path`](Self::unit_path), but creates the per-user unit
    /// directory when needed.
    fn config_path(&self) -> Result<PathBuf> {
        let path = self.unit_path()?;
        if self.is_user_service() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
            }
        }
        Ok(path)
    }

    /// Absolute path of the program the unit will execute.
    pub fn exec_path(&self) -> Result<PathBuf> {
        match &self.config.executable {
            Some(path) if path.is_absolute() => Ok(path.clone()),
            Some(path) => std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .map_err(|e| Error::io(path, e)),
            None => std::env::current_exe().map_err(|e| Error::io("/proc/self/exe", e)),
        }
    }

    pub fn has_output_file_support(&self) -> bool {
        probe::has_output_file_support(self.runner.as_ref(), self.is_user_service())
    }

    /// Render the unit file exactly as [`Service::install`] would write it.
    pub fn render_unit(&self) -> Result<String> {
        let path = self.exec_path()?;
        let context = UnitContext::new(
            &self.config,
            path.to_string_lossy().into_owned(),
            self.has_output_file_support(),
        );
        self.template.render(&context)
    }

    /// Arguments for `journalctl` showing this unit's log.
    pub fn journal_args(&self, lines: u32, follow: bool) -> Vec<String> {
        let mut args = Vec::new();
        if self.is_user_service() {
            args.push("--user".to_string());
        }
        args.extend(["-u".to_string(), self.unit_name()]);
        args.extend(["-n".to_string(), lines.to_string()]);
        if follow {
            args.push("-f".to_string());
        }
        args.push("--no-pager".to_string());
        args
    }

    /// Stream the unit's journal to the terminal.
    pub fn show_logs(&self, lines: u32, follow: bool) -> Result<()> {
        let args = self.journal_args(lines, follow);
        let line = format!("journalctl {}", args.join(" "));
        debug!(command = %line, "executing");

        let status = Command::new("journalctl")
            .args(&args)
            .status()
            .map_err(|source| Error::Spawn {
                command: line.clone(),
                source,
            })?;
        if !status.success() {
            return Err(Error::Command {
                command: line,
                exit_code: status.code().unwrap_or(-1),
                output: String::new(),
            });
        }
        Ok(())
    }

    fn systemctl_with_output(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut args = args.to_vec();
        if self.is_user_service() {
            args.push("--user");
        }
        self.runner.run_with_output("systemctl", &args)
    }

    fn systemctl(&self, action: &str, args: &[&str]) -> Result<()> {
        let mut full = vec![action];
        if self.is_user_service() {
            full.push("--user");
        }
        full.extend_from_slice(args);
        self.runner.run("systemctl", &full)
    }

    fn run_action(&self, action: &str) -> Result<()> {
        let unit = self.unit_name();
        self.systemctl(action, &[unit.as_str()])
    }
}

fn create_unit_file(path: &Path) -> Result<fs::File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::AlreadyInstalled {
                path: path.to_path_buf(),
            },
            _ => Error::io(path, e),
        })
}

impl Service for SystemdService {
    fn run(&self) -> Result<()> {
        self.interface.start(self).map_err(Error::Hook)?;

        let waited = self.run_wait.wait();
        debug!(service = %self.config.name, "wait finished, stopping");
        let stopped = self.interface.stop(self).map_err(Error::Hook);
        waited?;
        stopped
    }

    fn start(&self) -> Result<()> {
        self.run_action("start")
    }

    fn stop(&self) -> Result<()> {
        self.run_action("stop")
    }

    fn restart(&self) -> Result<()> {
        self.run_action("restart")
    }

    /// Writes the unit file, enables it and reloads systemd. A unit file
    /// written before a failing `enable` is left on disk.
    fn install(&self) -> Result<()> {
        let path = self.config_path()?;
        if path.exists() {
            return Err(Error::AlreadyInstalled { path });
        }

        let mut file = create_unit_file(&path)?;
        let unit = self.render_unit()?;
        file.write_all(unit.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), "wrote unit file");

        self.run_action("enable")?;
        self.systemctl("daemon-reload", &[])
    }

    fn uninstall(&self) -> Result<()> {
        let path = self.unit_path()?;
        if !path.exists() {
            return Err(Error::NotInstalled);
        }

        self.run_action("disable")?;
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), "removed unit file");
        self.systemctl("daemon-reload", &[])
    }

    fn status(&self) -> Result<Status> {
        let unit = self.unit_name();
        let output = self.systemctl_with_output(&["is-active", unit.as_str()])?;
        status::interpret(&output.stdout, &unit, || {
            let listing =
                self.systemctl_with_output(&["list-unit-files", "-t", "service", unit.as_str()])?;
            Ok(listing.stdout)
        })
    }

    fn logger(&self, errs: Option<Sender<Error>>) -> Result<Box<dyn Logger>> {
        if logger::interactive() {
            return Ok(Box::new(ConsoleLogger));
        }
        self.system_logger(errs)
    }

    fn system_logger(&self, errs: Option<Sender<Error>>) -> Result<Box<dyn Logger>> {
        Ok(Box::new(SysLogger::connect(self.config.name.clone(), errs)?))
    }

    fn platform(&self) -> &'static str {
        PLATFORM
    }

    fn display_name(&self) -> &str {
        if self.config.display_name.is_empty() {
            &self.config.name
        } else {
            &self.config.display_name
        }
    }
}

impl std::fmt::Debug for SystemdService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemdService")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
