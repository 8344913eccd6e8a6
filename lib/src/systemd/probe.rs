use crate::runner::CommandRunner;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// First systemd release that understands `StandardOutput=file:`.
pub const MIN_OUTPUT_FILE_VERSION: u32 = 236;

/// Extract the version number from `systemctl --version` output.
pub fn parse_version(output: &str) -> Option<u32> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re = VERSION.get_or_init(|| Regex::new(r"systemd ([0-9]+)").expect("valid regex"));
    re.captures(output)?.get(1)?.as_str().parse().ok()
}

/// Ask systemd for its version. `None` when it cannot be determined.
pub fn systemd_version(runner: &dyn CommandRunner, user: bool) -> Option<u32> {
    let mut args = vec!["--version"];
    if user {
        args.push("--user");
    }
    let output = match runner.run_with_output("systemctl", &args) {
        Ok(output) => output,
        Err(err) => {
            debug!(error = %err, "could not query systemd version");
            return None;
        }
    };
    parse_version(&output.stdout)
}

/// Whether log-file redirection directives may be emitted.
///
/// An undeterminable version counts as supported: losing log output on an
/// old systemd is preferred over never writing it on a new one.
pub fn has_output_file_support(runner: &dyn CommandRunner, user: bool) -> bool {
    match systemd_version(runner, user) {
        Some(version) => version >= MIN_OUTPUT_FILE_VERSION,
        None => true,
    }
}
