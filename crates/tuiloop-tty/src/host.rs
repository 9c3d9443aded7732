#![forbid(unsafe_code)]

use std::fs::{File, OpenOptions};
use std::io;

use nix::sys::termios::{self, LocalFlags, SetArg};
use tuiloop_backend::{LocalModes, TerminalHost};
use tuiloop_core::error::TerminalError;

/// The controlling terminal as a [`TerminalHost`].
///
/// Owns its own file descriptor, so attribute calls never need a borrowed
/// raw fd.
#[derive(Debug)]
pub struct TtyHost {
    tty: File,
}

impl TtyHost {
    /// Open `/dev/tty` for reading and writing.
    pub fn open() -> io::Result<Self> {
        let tty = OpenOptions::new().read(true).write(true).open("/dev/tty")?;
        Ok(Self { tty })
    }

    /// Wrap an already-open terminal (a pty slave in tests).
    #[must_use]
    pub fn from_file(tty: File) -> Self {
        Self { tty }
    }

    /// A second handle on the same terminal, for an input source.
    pub fn input_handle(&self) -> io::Result<File> {
        self.tty.try_clone()
    }
}

fn local_modes_of(flags: LocalFlags) -> LocalModes {
    let mut modes = LocalModes::empty();
    modes.set(LocalModes::ECHO, flags.contains(LocalFlags::ECHO));
    modes.set(LocalModes::ICANON, flags.contains(LocalFlags::ICANON));
    modes
}

impl TerminalHost for TtyHost {
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        let ws = rustix::termios::tcgetwinsize(&self.tty)
            .map_err(|e| TerminalError::SizeQuery(io::Error::from(e)))?;
        Ok((ws.ws_col, ws.ws_row))
    }

    fn local_modes(&self) -> Result<LocalModes, TerminalError> {
        let attrs = termios::tcgetattr(&self.tty).map_err(io::Error::from)?;
        Ok(local_modes_of(attrs.local_flags))
    }

    fn set_local_modes(&mut self, modes: LocalModes) -> Result<(), TerminalError> {
        let mut attrs = termios::tcgetattr(&self.tty).map_err(io::Error::from)?;
        attrs
            .local_flags
            .set(LocalFlags::ECHO, modes.contains(LocalModes::ECHO));
        attrs
            .local_flags
            .set(LocalFlags::ICANON, modes.contains(LocalModes::ICANON));
        termios::tcsetattr(&self.tty, SetArg::TCSANOW, &attrs).map_err(io::Error::from)?;
        Ok(())
    }
}
