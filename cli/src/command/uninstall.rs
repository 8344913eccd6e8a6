use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;
use svclib::Error;

#[derive(Debug, Args)]
pub struct Uninstall {}

impl Uninstall {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;

        print!("Uninstalling service '{}'...", service.display_name());
        match service.uninstall() {
            Ok(()) => println!(" done."),
            Err(Error::NotInstalled) => {
                println!();
                bail!("Service '{}' is not installed.", service.display_name());
            }
            Err(err) => {
                println!();
                return Err(err.into());
            }
        }

        Ok(())
    }
}
