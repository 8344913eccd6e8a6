use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;
use svclib::{Error, Status};

#[derive(Debug, Args)]
pub struct Stop {}

impl Stop {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;
        let name = service.display_name().to_string();

        match service.status() {
            Ok(Status::Stopped) => {
                println!("Service '{}' is already stopped.", name);
                return Ok(());
            }
            Err(Error::NotInstalled) => bail!("Service '{}' is not installed.", name),
            _ => {}
        }

        print!("Stopping service '{}'...", name);
        service.stop()?;
        println!(" done.");

        Ok(())
    }
}
