use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct Logs {
    #[arg(
        short = 'n',
        long,
        default_value = "50",
        help = "Number of lines to show"
    )]
    pub lines: u32,
    #[arg(short, long, help = "Follow log output (like tail -f)")]
    pub follow: bool,
}

impl Logs {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_systemd(config)?;
        service.show_logs(self.lines, self.follow)?;
        Ok(())
    }
}
