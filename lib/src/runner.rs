use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Captured result of an external command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn combined(&self) -> String {
        let mut output = self.stdout.clone();
        output.push_str(&self.stderr);
        output
    }
}

/// Executes external programs on behalf of a controller.
///
/// `run_with_output` only fails when the program could not be executed at
/// all; a non-zero exit status is reported through [`CommandOutput`].
/// `run` additionally turns a non-zero exit status into [`Error::Command`].
pub trait CommandRunner: Send + Sync {
    fn run_with_output(&self, command: &str, args: &[&str]) -> Result<CommandOutput>;

    fn run(&self, command: &str, args: &[&str]) -> Result<()> {
        let output = self.run_with_output(command, args)?;
        if !output.success() {
            return Err(Error::Command {
                command: command_line(command, args),
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }
        Ok(())
    }
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_with_output(&self, command: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(command, args);
        debug!(command = %line, "executing");

        let output = Command::new(command)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                command: line.clone(),
                source,
            })?;

        let output = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %line, exit_code = output.exit_code, "finished");
        Ok(output)
    }
}

pub(crate) fn command_line(command: &str, args: &[&str]) -> String {
    let mut line = command.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
