#![forbid(unsafe_code)]

use std::thread::{self, JoinHandle};

use signal_hook::consts::signal::{SIGINT, SIGWINCH};
use signal_hook::iterator::{Handle, Signals};
use tuiloop_backend::{NotificationSource, Poster, Task};
use tuiloop_core::error::TerminalError;

/// Forwards `SIGWINCH` and `SIGINT` to the main sequencing point.
///
/// Registering `SIGINT` here replaces the default disposition, so an
/// interrupt no longer kills the process; it arrives as [`Task::Interrupt`]
/// and takes the normal shutdown path. The forwarding thread only posts.
#[derive(Debug, Default)]
pub struct SignalBridge {
    handle: Option<Handle>,
    thread: Option<JoinHandle<()>>,
}

impl SignalBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSource for SignalBridge {
    fn start(&mut self, poster: Poster) -> Result<(), TerminalError> {
        if self.handle.is_some() {
            return Ok(());
        }
        let mut signals = Signals::new([SIGWINCH, SIGINT])
            .map_err(|e| TerminalError::SessionSetup(format!("signal registration: {e}")))?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("tuiloop-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    let task = match signal {
                        SIGWINCH => Task::Resize,
                        SIGINT => Task::Interrupt,
                        _ => continue,
                    };
                    if !poster.post(task) {
                        break;
                    }
                }
            })?;
        tracing::debug!("signal bridge started");
        self.handle = Some(handle);
        self.thread = Some(thread);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            tracing::debug!("signal bridge stopped");
        }
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.stop();
    }
}
