use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Restart {}

impl Restart {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;

        print!("Restarting service '{}'...", service.display_name());
        service.restart()?;
        println!(" done.");

        Ok(())
    }
}
