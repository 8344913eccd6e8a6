use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;
use svclib::{Error, Status};

#[derive(Debug, Args)]
pub struct Start {}

impl Start {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;
        let name = service.display_name().to_string();

        match service.status() {
            Ok(Status::Running) => {
                println!("Service '{}' is already running.", name);
                return Ok(());
            }
            Err(Error::NotInstalled) => bail!("Service '{}' is not installed.", name),
            _ => {}
        }

        print!("Starting service '{}'...", name);
        service.start()?;
        println!(" done.");

        Ok(())
    }
}
