use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Description of a background service to install and control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Unit name without the `.service` suffix.
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Program to run. Defaults to the running executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Raw `[Unit]` lines such as `After=network.target`.
    pub dependencies: Vec<String>,
    pub env_vars: BTreeMap<String, String>,
    pub options: SystemdOptions,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Checks that the name can be used as a unit name and file name.
    pub fn validate(&self) -> Result<()> {
        let valid = !self.name.is_empty()
            && self.name != "."
            && self.name != ".."
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.' | '@'));
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidName(self.name.clone()))
        }
    }
}

/// Tuning knobs for the generated unit. An empty string suppresses the
/// corresponding directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemdOptions {
    /// Install under `~/.config/systemd/user` and pass `--user` to systemctl.
    pub user_service: bool,
    pub reload_signal: String,
    /// Defaults to `/var/run/<name>.pid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<String>,
    /// Negative values leave `LimitNOFILE` unset.
    pub limit_nofile: i64,
    pub restart: String,
    pub success_exit_status: String,
    /// Redirect stdout/stderr to files under `log_directory`.
    pub log_output: bool,
    pub log_directory: String,
    pub restart_sec: String,
    pub kill_mode: String,
    pub kill_signal: String,
    pub timeout_stop_sec: String,
    /// Replaces the built-in unit template when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_template: Option<String>,
}

impl Default for SystemdOptions {
    fn default() -> Self {
        Self {
            user_service: false,
            reload_signal: "SIGHUP".to_string(),
            pid_file: None,
            limit_nofile: -1,
            restart: "always".to_string(),
            success_exit_status: "0".to_string(),
            log_output: false,
            log_directory: "/var/log".to_string(),
            restart_sec: "5s".to_string(),
            kill_mode: "control-group".to_string(),
            kill_signal: "SIGTERM".to_string(),
            timeout_stop_sec: "30s".to_string(),
            unit_template: None,
        }
    }
}

impl SystemdOptions {
    pub fn pid_file_for(&self, name: &str) -> String {
        match &self.pid_file {
            Some(pid_file) => pid_file.clone(),
            None => format!("/var/run/{}.pid", name),
        }
    }

    /// The override template, if one was supplied with any content.
    pub fn custom_template(&self) -> Option<&str> {
        self.unit_template
            .as_deref()
            .filter(|template| !template.trim().is_empty())
    }
}
