use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Control {
    #[arg(help = "One of: start, stop, restart, install, uninstall")]
    pub action: String,
}

impl Control {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_service(config)?;
        svclib::control(service.as_ref(), &self.action)?;
        println!("{} '{}': done.", self.action, service.display_name());
        Ok(())
    }
}
