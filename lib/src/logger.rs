use crate::error::{Error, Result};
use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{error, info, warn};

/// Sink for messages a service wants operators to see.
pub trait Logger: Send + Sync {
    fn error(&self, msg: &str) -> Result<()>;
    fn warning(&self, msg: &str) -> Result<()>;
    fn info(&self, msg: &str) -> Result<()>;
}

/// True when attached to a terminal rather than started by the init system.
pub fn interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Logs through `tracing`, for services running in a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn error(&self, msg: &str) -> Result<()> {
        error!("{msg}");
        Ok(())
    }

    fn warning(&self, msg: &str) -> Result<()> {
        warn!("{msg}");
        Ok(())
    }

    fn info(&self, msg: &str) -> Result<()> {
        info!("{msg}");
        Ok(())
    }
}

const SYSLOG_SOCKETS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

// LOG_DAEMON facility.
const FACILITY_DAEMON: u8 = 3;

#[derive(Debug, Clone, Copy)]
enum Severity {
    Error = 3,
    Warning = 4,
    Info = 6,
}

/// Writes to the local syslog daemon, tagged with the service name.
#[derive(Debug)]
pub struct SysLogger {
    tag: String,
    socket: UnixDatagram,
    path: PathBuf,
    errs: Option<Sender<Error>>,
}

impl SysLogger {
    /// Connect to the first syslog socket that accepts us. Failed writes are
    /// also reported on `errs` when given.
    pub fn connect(tag: impl Into<String>, errs: Option<Sender<Error>>) -> Result<Self> {
        let tag = tag.into();
        let mut last_err = None;
        for candidate in SYSLOG_SOCKETS {
            match Self::connect_to(tag.clone(), Path::new(candidate), errs.clone()) {
                Ok(logger) => return Ok(logger),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            Error::io(SYSLOG_SOCKETS[0], io::Error::from(io::ErrorKind::NotFound))
        }))
    }

    pub fn connect_to(
        tag: impl Into<String>,
        path: &Path,
        errs: Option<Sender<Error>>,
    ) -> Result<Self> {
        let socket = UnixDatagram::unbound().map_err(|e| Error::io(path, e))?;
        socket.connect(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            tag: tag.into(),
            socket,
            path: path.to_path_buf(),
            errs,
        })
    }

    fn format(&self, severity: Severity, msg: &str) -> String {
        let priority = FACILITY_DAEMON * 8 + severity as u8;
        format!("<{priority}>{}[{}]: {msg}", self.tag, std::process::id())
    }

    fn send(&self, severity: Severity, msg: &str) -> Result<()> {
        let line = self.format(severity, msg);
        match self.socket.send(line.as_bytes()) {
            Ok(_) => Ok(()),
            Err(err) => {
                if let Some(errs) = &self.errs {
                    let copy = io::Error::new(err.kind(), err.to_string());
                    let _ = errs.send(Error::io(&self.path, copy));
                }
                Err(Error::io(&self.path, err))
            }
        }
    }
}

impl Logger for SysLogger {
    fn error(&self, msg: &str) -> Result<()> {
        self.send(Severity::Error, msg)
    }

    fn warning(&self, msg: &str) -> Result<()> {
        self.send(Severity::Warning, msg)
    }

    fn info(&self, msg: &str) -> Result<()> {
        self.send(Severity::Info, msg)
    }
}
