use anyhow::Result;
use clap::Args;
use std::path::Path;
use svclib::{Error, Service};
use tabled::{
    settings::{Padding, Style},
    Table, Tabled,
};

#[derive(Debug, Args)]
pub struct Status {}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Path")]
    path: String,
}

/// Text shown for a status query result.
fn describe(status: svclib::Result<svclib::Status>) -> Result<String> {
    match status {
        Ok(status) => Ok(status.to_string()),
        Err(Error::NotInstalled) => Ok("not installed".to_string()),
        Err(Error::FailedState) => Ok("failed".to_string()),
        Err(err) => Err(err.into()),
    }
}

impl Status {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_systemd(config)?;
        let row = ServiceRow {
            name: service.config().name.clone(),
            status: describe(service.status())?,
            scope: if service.is_user_service() { "user" } else { "system" }.to_string(),
            path: service.unit_path()?.display().to_string(),
        };

        // Check if output is piped (not a terminal)
        if atty::isnt(atty::Stream::Stdout) {
            println!("{}\t{}\t{}\t{}", row.name, row.status, row.scope, row.path);
        } else {
            let mut table = Table::new([row]);
            table.with(Style::blank()).with(Padding::zero());
            println!("{table}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(Ok(svclib::Status::Running)).unwrap(), "running");
        assert_eq!(describe(Ok(svclib::Status::Stopped)).unwrap(), "stopped");
        assert_eq!(describe(Err(Error::NotInstalled)).unwrap(), "not installed");
        assert_eq!(describe(Err(Error::FailedState)).unwrap(), "failed");
        assert!(describe(Err(Error::UnsupportedPlatform)).is_err());
    }
}
