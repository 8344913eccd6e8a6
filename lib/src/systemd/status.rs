//! Interpretation of `systemctl is-active` and `systemctl list-unit-files`
//! output.

use crate::error::{Error, Result};
use crate::Status;

/// What the first line of `systemctl is-active` tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveState {
    Running,
    /// Either stopped or not installed at all; needs a second look.
    Inactive,
    Failed,
    Unrecognized,
}

const ACTIVE_STATES: &[(&str, ActiveState)] = &[
    ("active", ActiveState::Running),
    ("activating", ActiveState::Running),
    ("inactive", ActiveState::Inactive),
    ("failed", ActiveState::Failed),
];

pub fn parse_active_state(output: &str) -> ActiveState {
    ACTIVE_STATES
        .iter()
        .find(|(prefix, _)| output.starts_with(prefix))
        .map(|&(_, state)| state)
        .unwrap_or(ActiveState::Unrecognized)
}

/// Whether a `list-unit-files` listing has a row for `unit`
/// (e.g. `demo.service`). Header and footer lines never match.
pub fn listing_contains(output: &str, unit: &str) -> bool {
    output
        .lines()
        .any(|line| line.split_whitespace().next() == Some(unit))
}

/// Map `is-active` output to a status. `list_unit_files` is only consulted
/// for an inactive unit, to tell a stopped unit from a missing one.
pub fn interpret<F>(is_active: &str, unit: &str, list_unit_files: F) -> Result<Status>
where
    F: FnOnce() -> Result<String>,
{
    match parse_active_state(is_active) {
        ActiveState::Running => Ok(Status::Running),
        ActiveState::Inactive => {
            if listing_contains(&list_unit_files()?, unit) {
                Ok(Status::Stopped)
            } else {
                Err(Error::NotInstalled)
            }
        }
        ActiveState::Failed => Err(Error::FailedState),
        ActiveState::Unrecognized => Err(Error::NotInstalled),
    }
}
