//! Rendering of systemd unit files.
//!
//! The unit is produced by a [minijinja] template. The built-in template
//! covers the usual case; callers can supply their own through
//! [`SystemdOptions::unit_template`](crate::SystemdOptions::unit_template),
//! which sees the same context and filters.

use crate::config::ServiceConfig;
use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;
use std::collections::BTreeMap;

const TEMPLATE_NAME: &str = "unit.service";

/// The default unit definition.
pub const SYSTEMD_UNIT: &str = r#"[Unit]
Description={{ description }}
ConditionFileIsExecutable={{ path | quote }}
{%- for dep in dependencies %}
{{ dep }}
{%- endfor %}

[Service]
StartLimitInterval=5
StartLimitBurst=10
ExecStart={{ path | quote }}{% for arg in arguments %} {{ arg | quote }}{% endfor %}
{%- if chroot %}
RootDirectory={{ chroot | quote }}
{%- endif %}
{%- if working_directory %}
WorkingDirectory={{ working_directory | quote }}
{%- endif %}
{%- if user_name %}
User={{ user_name }}
{%- endif %}
{%- if reload_signal %}
ExecReload=/bin/kill -{{ reload_signal }} "$MAINPID"
{%- endif %}
{%- if pid_file %}
PIDFile={{ pid_file | quote }}
{%- endif %}
{%- if log_output and has_output_file_support %}
StandardOutput=file:{{ log_directory }}/{{ name }}.out
StandardError=file:{{ log_directory }}/{{ name }}.err
{%- endif %}
{%- if limit_nofile >= 0 %}
LimitNOFILE={{ limit_nofile }}
{%- endif %}
{%- if restart %}
Restart={{ restart }}
{%- endif %}
{%- if success_exit_status %}
SuccessExitStatus={{ success_exit_status }}
{%- endif %}
{%- if restart_sec %}
RestartSec={{ restart_sec }}
{%- endif %}
EnvironmentFile=-/etc/sysconfig/{{ name }}
{%- if kill_mode %}
KillMode={{ kill_mode }}
{%- endif %}
{%- if kill_signal %}
KillSignal={{ kill_signal }}
{%- endif %}
{%- if timeout_stop_sec %}
TimeoutStopSec={{ timeout_stop_sec }}
{%- endif %}
{%- for key, value in env_vars | items %}
Environment={{ key }}={{ value }}
{%- endfor %}

[Install]
WantedBy=multi-user.target
"#;

/// Quote a value for a systemd command line or path directive.
///
/// Values containing whitespace, `"` or `\` are wrapped in double quotes
/// with embedded quotes and backslashes escaped. Anything else is returned
/// unchanged.
pub fn quote(value: &str) -> String {
    if !value.contains([' ', '\t', '"', '\\']) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Everything a unit template can refer to.
#[derive(Debug, Clone, Serialize)]
pub struct UnitContext<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: &'a str,
    pub path: String,
    pub arguments: &'a [String],
    pub working_directory: Option<&'a str>,
    pub chroot: Option<&'a str>,
    pub user_name: Option<&'a str>,
    pub dependencies: &'a [String],
    pub env_vars: &'a BTreeMap<String, String>,
    pub has_output_file_support: bool,
    pub reload_signal: &'a str,
    pub pid_file: String,
    pub limit_nofile: i64,
    pub restart: &'a str,
    pub success_exit_status: &'a str,
    pub log_output: bool,
    pub log_directory: &'a str,
    pub restart_sec: &'a str,
    pub kill_mode: &'a str,
    pub kill_signal: &'a str,
    pub timeout_stop_sec: &'a str,
}

impl<'a> UnitContext<'a> {
    /// Resolve the context for `config` with the given executable path and
    /// capability flag.
    pub fn new(config: &'a ServiceConfig, path: String, has_output_file_support: bool) -> Self {
        let options = &config.options;
        Self {
            name: &config.name,
            display_name: &config.display_name,
            description: &config.description,
            path,
            arguments: &config.arguments,
            working_directory: config.working_directory.as_deref(),
            chroot: config.chroot.as_deref(),
            user_name: config.user_name.as_deref(),
            dependencies: &config.dependencies,
            env_vars: &config.env_vars,
            has_output_file_support,
            reload_signal: &options.reload_signal,
            pid_file: options.pid_file_for(&config.name),
            limit_nofile: options.limit_nofile,
            restart: &options.restart,
            success_exit_status: &options.success_exit_status,
            log_output: options.log_output,
            log_directory: &options.log_directory,
            restart_sec: &options.restart_sec,
            kill_mode: &options.kill_mode,
            kill_signal: &options.kill_signal,
            timeout_stop_sec: &options.timeout_stop_sec,
        }
    }
}

/// A compiled unit template.
pub struct UnitTemplate {
    env: Environment<'static>,
}

impl UnitTemplate {
    /// Compile `custom` if given, otherwise the built-in template. Syntax
    /// errors surface here rather than at render time.
    pub fn new(custom: Option<&str>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_filter("quote", |value: String| quote(&value));
        match custom {
            Some(source) => env.add_template_owned(TEMPLATE_NAME, source.to_string())?,
            None => env.add_template(TEMPLATE_NAME, SYSTEMD_UNIT)?,
        }
        Ok(Self { env })
    }

    pub fn render(&self, context: &UnitContext<'_>) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context)?)
    }
}

impl std::fmt::Debug for UnitTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitTemplate").finish_non_exhaustive()
    }
}
