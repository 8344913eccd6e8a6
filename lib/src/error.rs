use std::io;
use std::path::PathBuf;

/// Boxed error returned by the embedding application's hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Init already exists: {}", path.display())]
    AlreadyInstalled { path: PathBuf },

    #[error("the service is not installed")]
    NotInstalled,

    #[error("service in failed state")]
    FailedState,

    #[error("`{command}` failed with exit code {exit_code}: {}", output.trim())]
    Command {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("failed to execute `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("unit template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid unit file at line {line}: {reason}")]
    InvalidUnit { line: usize, reason: String },

    #[error("invalid service name {0:?}")]
    InvalidName(String),

    #[error("could not determine the home directory for a user service")]
    HomeDirUnavailable,

    #[error("service hook failed: {0}")]
    Hook(#[source] BoxError),

    #[error("failed to subscribe to termination signals: {0}")]
    Signal(#[source] std::io::Error),

    #[error("unknown action {action:?}, valid actions are: {}", crate::CONTROL_ACTIONS.join(", "))]
    UnknownAction { action: String },

    #[error("no supported init system detected")]
    UnsupportedPlatform,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
