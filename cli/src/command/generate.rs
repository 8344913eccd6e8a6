use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Generate {}

impl Generate {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_systemd(config)?;
        let content = service.render_unit()?;
        print!("{content}");

        eprintln!(
            "{} is the suggested file path.",
            service.unit_path()?.display()
        );
        Ok(())
    }
}
