#![forbid(unsafe_code)]

//! Native Unix host wiring.
//!
//! [`open`] assembles a [`Host`] from the `tuiloop-tty` pieces: the
//! controlling terminal for size and attributes, the input strategy picked
//! by [`resolve_strategy`], and the signal bridge.

use std::fs::File;
use std::io;
use std::os::fd::AsFd;

use tuiloop_backend::{InputSource, InputStrategy};
use tuiloop_runtime::{AppConfig, Host, InputChoice};
use tuiloop_tty::{
    PollingWorkerSource, ReactiveSource, SignalBridge, TtyConsole, TtyHost, WorkerConfig,
    stdin_is_terminal,
};

/// Pick the input strategy for `choice`.
///
/// `Auto` waits on standard input directly when it is a terminal, and falls
/// back to the polling worker over the controlling terminal when standard
/// input has been redirected.
#[must_use]
pub fn resolve_strategy(choice: InputChoice, stdin_tty: bool) -> InputStrategy {
    match choice {
        InputChoice::Reactive => InputStrategy::Reactive,
        InputChoice::PollingWorker => InputStrategy::PollingWorker,
        InputChoice::Auto if stdin_tty => InputStrategy::Reactive,
        InputChoice::Auto => InputStrategy::PollingWorker,
    }
}

/// Worker timing taken from the application config.
#[must_use]
pub fn worker_config(config: &AppConfig) -> WorkerConfig {
    WorkerConfig {
        poll_interval: config.poll_interval,
        escape_timeout: config.escape_timeout,
    }
}

/// Open the controlling terminal and build a [`Host`] for `config`.
///
/// # Errors
///
/// Fails if there is no controlling terminal or a descriptor cannot be
/// duplicated.
pub fn open(config: &AppConfig) -> io::Result<Host> {
    let stdin_tty = stdin_is_terminal();
    let strategy = resolve_strategy(config.input, stdin_tty);
    let terminal = TtyHost::open()?;
    let input: Box<dyn InputSource> = match strategy {
        InputStrategy::Reactive => {
            let fd = if stdin_tty {
                File::from(io::stdin().as_fd().try_clone_to_owned()?)
            } else {
                terminal.input_handle()?
            };
            Box::new(ReactiveSource::new(fd, config.read_buffer))
        }
        InputStrategy::PollingWorker => Box::new(PollingWorkerSource::new(
            TtyConsole::open()?,
            worker_config(config),
        )),
    };
    tracing::debug!(choice = ?config.input, stdin_tty, strategy = %strategy, "native host opened");
    Ok(Host {
        terminal: Box::new(terminal),
        input,
        notifications: Box::new(SignalBridge::new()),
    })
}
