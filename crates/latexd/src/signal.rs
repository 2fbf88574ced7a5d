//! Interrupt and termination requests
//!
//! Listeners are installed once at startup so that a signal arriving while
//! the staging directory is being assembled is still observed when the
//! driver runs.

use std::io;

pub struct Shutdown {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl Shutdown {
    /// Must be called from within the runtime
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(windows)]
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    #[cfg(not(any(unix, windows)))]
    pub fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Completes on the first interrupt or termination request
    pub async fn recv(&mut self) {
        #[cfg(unix)]
        tokio::select! {
            _ = self.interrupt.recv() => log::debug!("received SIGINT"),
            _ = self.terminate.recv() => log::debug!("received SIGTERM"),
        }

        #[cfg(windows)]
        {
            self.ctrl_c.recv().await;
            log::debug!("received Ctrl-C");
        }

        #[cfg(not(any(unix, windows)))]
        std::future::pending::<()>().await;
    }
}
