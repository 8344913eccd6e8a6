use anyhow::Context;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::collections::BTreeMap;
use svclib::platform::find_executable;
use svclib::{ServiceConfig, SystemdOptions};

/// Prompt for a service definition. `command` pre-fills the program and
/// its arguments.
pub fn collect_service_config(
    theme: &ColorfulTheme,
    mut command: Vec<String>,
) -> anyhow::Result<ServiceConfig> {
    println!("Creating service configuration...\n");

    if command.is_empty() {
        let c = Input::with_theme(theme)
            .with_prompt("Command to execute")
            .validate_with(|input: &String| -> anyhow::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Command cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        command = c.split_whitespace().map(String::from).collect();
    }

    let program = command.remove(0);
    let arguments = command;

    let executable = find_executable(&program)
        .with_context(|| format!("Failed to resolve binary path for '{}'", program))?;

    let default_basename = default_name(&executable);
    let name: String = Input::with_theme(theme)
        .with_prompt("Service name")
        .default(default_basename)
        .validate_with(|input: &String| -> anyhow::Result<(), String> {
            ServiceConfig::new(input.trim())
                .validate()
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let description: String = Input::with_theme(theme)
        .with_prompt("Description")
        .default(name.clone())
        .interact_text()?;

    let working_directory = optional(theme, "Working directory path")?;
    let user_name = optional(theme, "Run as user")?;

    let env_vars = {
        let mut vars = BTreeMap::new();
        loop {
            let kv: String = Input::with_theme(theme)
                .with_prompt("Environment variable KEY=VALUE (or leave empty to finish)")
                .allow_empty(true)
                .interact_text()?;
            if kv.trim().is_empty() {
                break;
            }
            let Some((k, v)) = kv.split_once('=') else {
                eprintln!("Format is 'KEY=VALUE'. Please try again.");
                continue;
            };
            vars.insert(k.trim().to_string(), v.trim().to_string());
        }
        vars
    };

    let user_service = Confirm::with_theme(theme)
        .with_prompt("Install as a per-user service?")
        .default(false)
        .interact()?;

    let keep_alive = Confirm::with_theme(theme)
        .with_prompt("Restart automatically if it crashes?")
        .default(true)
        .interact()?;

    let dependencies = {
        let networked = Confirm::with_theme(theme)
            .with_prompt("Networked service?")
            .default(true)
            .interact()?;
        if networked {
            vec![
                "After=network.target network-online.target".to_string(),
                "Wants=network-online.target".to_string(),
            ]
        } else {
            Vec::new()
        }
    };

    let log_output = Confirm::with_theme(theme)
        .with_prompt("Write stdout/stderr to files under /var/log?")
        .default(false)
        .interact()?;

    Ok(ServiceConfig {
        name: name.trim().to_string(),
        display_name: String::new(),
        description,
        executable: Some(executable),
        arguments,
        working_directory,
        chroot: None,
        user_name,
        dependencies,
        env_vars,
        options: SystemdOptions {
            user_service,
            restart: if keep_alive { "always" } else { "no" }.to_string(),
            log_output,
            ..Default::default()
        },
    })
}

fn optional(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<Option<String>> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.trim().to_string()))
    }
}

fn default_name(executable: &std::path::Path) -> String {
    executable
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "service".to_string())
}
