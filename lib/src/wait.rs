//! Blocking policies used by [`Service::run`](crate::Service::run) between
//! the start and stop hooks.

use crate::error::{Error, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::os::raw::c_int;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Blocks the calling thread until the service should shut down.
pub trait RunWait: Send + Sync {
    fn wait(&self) -> Result<()>;
}

impl<F> RunWait for F
where
    F: Fn() + Send + Sync,
{
    fn wait(&self) -> Result<()> {
        self();
        Ok(())
    }
}

/// Waits for SIGINT or SIGTERM. SIGHUP is left alone so a reload request
/// does not end the run.
///
/// The subscription is made once per process and shared by every
/// `SignalWait`. Signals that arrived while nobody was waiting are
/// discarded, so each call blocks for a fresh one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalWait;

pub const TERMINATION_SIGNALS: [c_int; 2] = [SIGTERM, SIGINT];

static SIGNALS: Mutex<Option<Arc<Mutex<Signals>>>> = Mutex::new(None);

fn termination_signals() -> Result<Arc<Mutex<Signals>>> {
    let mut signals = SIGNALS.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(subscription) = signals.as_ref() {
        return Ok(subscription.clone());
    }
    let subscription = Signals::new(TERMINATION_SIGNALS).map_err(Error::Signal)?;
    let subscription = Arc::new(Mutex::new(subscription));
    *signals = Some(subscription.clone());
    Ok(subscription)
}

impl RunWait for SignalWait {
    fn wait(&self) -> Result<()> {
        let subscription = termination_signals()?;
        let mut signals = subscription.lock().unwrap_or_else(|e| e.into_inner());
        for stale in signals.pending() {
            debug!(signal = stale, "discarding signal received before wait");
        }
        debug!("waiting for a termination signal");
        if let Some(signal) = signals.forever().next() {
            debug!(signal, "termination signal received");
        }
        Ok(())
    }
}

/// Receiving half of a one-shot shutdown notification.
#[derive(Debug)]
pub struct ShutdownChannel {
    rx: Mutex<Receiver<()>>,
}

/// Sending half of a [`ShutdownChannel`]. Dropping every handle also
/// releases the waiter.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: SyncSender<()>,
}

/// Create a connected handle and wait policy.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownChannel) {
    let (tx, rx) = mpsc::sync_channel(1);
    (
        ShutdownHandle { tx },
        ShutdownChannel { rx: Mutex::new(rx) },
    )
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.try_send(());
    }
}

impl RunWait for ShutdownChannel {
    fn wait(&self) -> Result<()> {
        let rx = self.rx.lock().unwrap_or_else(|e| e.into_inner());
        let _ = rx.recv();
        Ok(())
    }
}
