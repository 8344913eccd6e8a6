use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::path::Path;

use crate::interactive::collect_service_config;

#[derive(Debug, Args)]
pub struct New {
    #[arg(help = "Command to run, e.g. `svc new -- /usr/bin/app --port 80`")]
    command: Vec<String>,
}

impl New {
    pub fn run(&self, config: &Path) -> Result<()> {
        let theme = ColorfulTheme::default();

        if config.exists() {
            let overwrite = Confirm::with_theme(&theme)
                .with_prompt(format!("{} exists. Overwrite it?", config.display()))
                .default(false)
                .interact()?;
            if !overwrite {
                bail!("Refusing to overwrite {}", config.display());
            }
        }

        let details = collect_service_config(&theme, self.command.clone())?;
        let content = toml::to_string_pretty(&details)?;
        fs::write(config, content)
            .with_context(|| format!("Failed to write service definition: {}", config.display()))?;
        println!("Wrote {}.", config.display());

        let install_now = Confirm::with_theme(&theme)
            .with_prompt("Install the service now?")
            .default(true)
            .interact()?;
        if !install_now {
            return Ok(());
        }

        let service = super::open_service(config)?;
        print!("Installing service '{}'...", service.display_name());
        service.install()?;
        println!(" done.");

        let start_now = Confirm::with_theme(&theme)
            .with_prompt("Start the service now?")
            .default(true)
            .interact()?;
        if start_now {
            print!("Starting service '{}'...", service.display_name());
            service.start()?;
            println!(" done.");
        }

        Ok(())
    }
}
