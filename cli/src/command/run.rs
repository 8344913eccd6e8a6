use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Run {}

impl Run {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;
        service.run()?;
        Ok(())
    }
}
