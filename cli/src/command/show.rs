use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use svclib::systemd::unit::{parse_unit, UnitFile};
use svclib::SystemdService;
use tabled::{
    settings::{Padding, Style},
    Table, Tabled,
};

#[derive(Debug, Args)]
pub struct Show {}

#[derive(Debug, PartialEq, Tabled)]
struct DirectiveRow {
    #[tabled(rename = "Directive")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

const KEY_DIRECTIVES: &[(&str, &str)] = &[
    ("Unit", "Description"),
    ("Service", "ExecStart"),
    ("Service", "User"),
    ("Service", "WorkingDirectory"),
    ("Service", "Restart"),
    ("Service", "KillSignal"),
    ("Service", "PIDFile"),
];

/// The directives worth showing, in display order. Missing ones are skipped.
fn key_directives(unit: &UnitFile) -> Vec<DirectiveRow> {
    let mut rows: Vec<DirectiveRow> = KEY_DIRECTIVES
        .iter()
        .filter_map(|&(section, key)| {
            unit.get(section, key).map(|value| DirectiveRow {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect();

    if let Some(service) = unit.section("Service") {
        rows.extend(service.get_all("Environment").map(|value| DirectiveRow {
            key: "Environment".to_string(),
            value: value.to_string(),
        }));
    }
    rows
}

/// Parse the unit file currently installed for `service`.
fn read_installed_unit(service: &SystemdService) -> Result<(PathBuf, UnitFile)> {
    let path = service.unit_path()?;
    if !path.exists() {
        bail!("{} is not installed.", service.unit_name());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read unit file: {}", path.display()))?;
    let unit = parse_unit(&contents)
        .with_context(|| format!("Failed to parse unit file: {}", path.display()))?;
    Ok((path, unit))
}

impl Show {
    pub fn run(&self, config: &Path) -> Result<()> {
        let service = super::open_systemd(config)?;
        let (path, unit) = read_installed_unit(&service)?;

        println!("Service: {}", service.unit_name());
        println!("Path: {}", path.display());

        let rows = key_directives(&unit);
        if atty::isnt(atty::Stream::Stdout) {
            for row in &rows {
                println!("{}\t{}", row.key, row.value);
            }
        } else {
            let mut table = Table::new(rows);
            table.with(Style::blank()).with(Padding::new(0, 2, 0, 0));
            println!("{table}");
        }
        Ok(())
    }
}
