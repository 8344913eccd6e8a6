use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use svclib::{BoxError, Interface, Service, ServiceConfig};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the configured program as a child process for `svc run`.
pub struct Supervisor {
    program: Option<PathBuf>,
    arguments: Vec<String>,
    working_directory: Option<String>,
    env_vars: BTreeMap<String, String>,
    stop_timeout: Duration,
    child: Mutex<Option<Child>>,
}

impl Supervisor {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            program: config.executable.clone(),
            arguments: config.arguments.clone(),
            working_directory: config.working_directory.clone(),
            env_vars: config.env_vars.clone(),
            stop_timeout: parse_seconds(&config.options.timeout_stop_sec)
                .unwrap_or(Duration::from_secs(30)),
            child: Mutex::new(None),
        }
    }
}

/// Parse the plain-seconds forms of a systemd time span (`30`, `30s`).
fn parse_seconds(span: &str) -> Option<Duration> {
    let span = span.trim();
    let digits = span.strip_suffix('s').unwrap_or(span);
    digits.parse().ok().map(Duration::from_secs)
}

fn announce(service: &dyn Service, msg: &str) {
    match service.logger(None) {
        Ok(logger) => {
            if let Err(err) = logger.info(msg) {
                warn!(error = %err, "failed to log");
            }
        }
        Err(err) => warn!(error = %err, "no logger available"),
    }
}

impl Interface for Supervisor {
    fn start(&self, service: &dyn Service) -> Result<(), BoxError> {
        let program = self
            .program
            .as_ref()
            .ok_or("no executable configured for this service")?;

        let mut command = Command::new(program);
        command.args(&self.arguments).envs(&self.env_vars);
        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }
        let child = command
            .spawn()
            .map_err(|e| format!("failed to start {}: {e}", program.display()))?;

        info!(pid = child.id(), program = %program.display(), "started");
        announce(service, &format!("started {} (pid {})", program.display(), child.id()));
        *self.child.lock().unwrap_or_else(|e| e.into_inner()) = Some(child);
        Ok(())
    }

    fn stop(&self, service: &dyn Service) -> Result<(), BoxError> {
        let Some(mut child) = self.child.lock().unwrap_or_else(|e| e.into_inner()).take() else {
            return Ok(());
        };

        let pid = child.id();
        if let Err(err) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, error = %err, "failed to send SIGTERM");
        }

        let deadline = Instant::now() + self.stop_timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                warn!(pid, "did not exit in time, killing");
                child.kill()?;
                break child.wait()?;
            }
            thread::sleep(POLL_INTERVAL);
        };

        info!(pid, %status, "stopped");
        announce(service, &format!("stopped pid {pid}: {status}"));
        Ok(())
    }
}
