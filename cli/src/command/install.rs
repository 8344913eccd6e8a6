use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Install {}

impl Install {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;

        print!("Installing service '{}'...", service.display_name());
        service.install()?;
        println!(" done.");

        Ok(())
    }
}
