#![forbid(unsafe_code)]
//! Native Unix host for tuiloop.
//!
//! `tuiloop-tty` implements the host boundary from `tuiloop-backend` on top
//! of safe Unix bindings:
//!
//! - [`TtyHost`] queries and toggles terminal attributes (`nix` termios,
//!   `rustix` winsize).
//! - [`ReactiveSource`] waits for descriptor readiness on the main sequencing
//!   point itself, with a self-pipe [`Waker`](tuiloop_backend::Waker) so
//!   posted tasks interrupt the wait.
//! - [`PollingWorkerSource`] runs a background worker over any
//!   [`ConsoleHost`]; [`TtyConsole`] is the Unix console.
//! - [`SignalBridge`] forwards `SIGWINCH` and `SIGINT` as run-queue tasks.
//!
//! All `unsafe` is delegated to `nix`, `rustix` and `signal-hook`.

#[cfg(unix)]
mod console;
#[cfg(unix)]
mod decode;
#[cfg(unix)]
mod host;
pub mod keymap;
#[cfg(unix)]
mod reactive;
#[cfg(unix)]
mod signals;
mod worker;

#[cfg(unix)]
pub use console::TtyConsole;
#[cfg(unix)]
pub use host::TtyHost;
pub use keymap::{KeyOutput, KeyRecord, translate_record};
#[cfg(unix)]
pub use reactive::ReactiveSource;
#[cfg(unix)]
pub use signals::SignalBridge;
pub use worker::{ConsoleHost, PollingWorkerSource, WorkerConfig};

/// Whether standard input is attached to a terminal.
///
/// This is the runtime check behind automatic strategy selection: a terminal
/// on stdin can be waited on directly, a redirected stdin cannot.
#[must_use]
pub fn stdin_is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal()
}
