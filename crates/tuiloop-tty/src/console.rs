#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use tuiloop_core::event::{DELETE, END_OF_TRANSMISSION, ESCAPE};

use crate::decode::Utf8Carry;
use crate::keymap::{KeyRecord, vk};
use crate::worker::ConsoleHost;

const READ_CHUNK: usize = 64;

/// The controlling terminal as a [`ConsoleHost`].
///
/// Bytes read from the terminal are decoded and reported as one key record
/// per character, with virtual key codes assigned the way a console input
/// API would report them. End of file reads as Ctrl-D.
pub struct TtyConsole {
    tty: File,
    carry: Utf8Carry,
    ready: VecDeque<KeyRecord>,
}

impl TtyConsole {
    #[must_use]
    pub fn new(tty: File) -> Self {
        Self {
            tty,
            carry: Utf8Carry::new(),
            ready: VecDeque::new(),
        }
    }

    /// Open `/dev/tty` for reading.
    pub fn open() -> io::Result<Self> {
        Ok(Self::new(File::open("/dev/tty")?))
    }

    fn readable(&self, timeout: PollTimeout) -> io::Result<bool> {
        let mut fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, timeout) {
            Ok(n) => Ok(n > 0),
            Err(Errno::EINTR) => Ok(false),
            Err(e) => Err(io::Error::from(e)),
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        let n = match self.tty.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(()),
            Err(e) => return Err(e),
        };
        if n == 0 {
            self.ready.push_back(record_for(END_OF_TRANSMISSION));
            return Ok(());
        }
        let text = self.carry.push(&buf[..n]);
        self.ready.extend(text.chars().map(record_for));
        Ok(())
    }
}

impl ConsoleHost for TtyConsole {
    fn pending_records(&mut self) -> io::Result<usize> {
        if self.ready.is_empty() && self.readable(PollTimeout::ZERO)? {
            self.fill()?;
        }
        Ok(self.ready.len())
    }

    fn read_record(&mut self) -> io::Result<KeyRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Ok(record);
            }
            if self.readable(PollTimeout::NONE)? {
                self.fill()?;
            }
        }
    }
}

/// The key record a terminal byte stands for.
fn record_for(c: char) -> KeyRecord {
    let code = match c {
        ESCAPE => vk::ESCAPE,
        '\r' | '\n' => vk::RETURN,
        DELETE | '\u{8}' => vk::BACK,
        ' ' => vk::SPACE,
        '[' => vk::OEM_4,
        '0'..='9' | 'A'..='Z' => c as u16,
        'a'..='z' => c.to_ascii_uppercase() as u16,
        // Ctrl-D; other control letters have no meaning to the loop.
        END_OF_TRANSMISSION => vk::KEY_A + 3,
        _ => 0,
    };
    KeyRecord::down(code, Some(c))
}
