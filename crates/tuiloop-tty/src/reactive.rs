#![forbid(unsafe_code)]

//! Reactive-fd input strategy.
//!
//! The main sequencing point parks in `poll(2)` on two descriptors: the input
//! descriptor and the read end of a self-pipe. Background producers wake it
//! by writing to the pipe (see [`PipeWaker`]); readable input is read and
//! queued as one [`Task::Input`] chunk. No threads are involved.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::os::unix::net::UnixStream;

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use tuiloop_backend::{InputSource, InputStrategy, RunQueue, Task, Waker};
use tuiloop_core::error::InputError;
use tuiloop_core::event::END_OF_TRANSMISSION;

use crate::decode::Utf8Carry;

/// Write end of the self-pipe. Non-blocking: if the pipe is full a wake is
/// already pending.
struct PipeWaker(UnixStream);

impl Waker for PipeWaker {
    fn wake(&self) {
        let _ = (&self.0).write(&[1]);
    }
}

/// [`InputSource`] that waits for descriptor readiness on the main
/// sequencing point.
pub struct ReactiveSource {
    input: File,
    wake_rx: Option<UnixStream>,
    read_buffer: usize,
    carry: Utf8Carry,
    eof: bool,
}

impl ReactiveSource {
    /// `input` is usually a duplicate of standard input.
    #[must_use]
    pub fn new(input: File, read_buffer: usize) -> Self {
        Self {
            input,
            wake_rx: None,
            read_buffer: read_buffer.max(1),
            carry: Utf8Carry::new(),
            eof: false,
        }
    }

    fn drain_wakes(wake_rx: &UnixStream) {
        let mut buf = [0u8; 64];
        while matches!((&*wake_rx).read(&mut buf), Ok(n) if n > 0) {}
    }

    fn read_input(&mut self, queue: &RunQueue) -> Result<(), InputError> {
        let mut buf = vec![0u8; self.read_buffer];
        match self.input.read(&mut buf) {
            Ok(0) => {
                tracing::debug!("input reached end of file");
                self.eof = true;
                queue.defer(Task::Input(END_OF_TRANSMISSION.to_string()));
            }
            Ok(n) => {
                let text = self.carry.push(&buf[..n]);
                if !text.is_empty() {
                    queue.defer(Task::Input(text));
                }
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) => {}
            Err(e) => return Err(InputError::Io(e)),
        }
        Ok(())
    }
}

impl InputSource for ReactiveSource {
    fn strategy(&self) -> InputStrategy {
        InputStrategy::Reactive
    }

    fn start(&mut self, queue: &mut RunQueue) -> Result<(), InputError> {
        if self.wake_rx.is_some() {
            return Ok(());
        }
        let (rx, tx) = UnixStream::pair()?;
        rx.set_nonblocking(true)?;
        tx.set_nonblocking(true)?;
        if !queue.set_waker(Box::new(PipeWaker(tx))) {
            tracing::warn!("run queue already has a waker; posts may not interrupt input waits");
        }
        self.wake_rx = Some(rx);
        Ok(())
    }

    fn park(&mut self, queue: &mut RunQueue) -> Result<(), InputError> {
        if self.eof {
            return queue.wait();
        }
        let Some(wake_rx) = self.wake_rx.as_ref() else {
            return queue.wait();
        };
        let (input_ready, woken) = {
            let mut fds = [
                PollFd::new(self.input.as_fd(), PollFlags::POLLIN),
                PollFd::new(wake_rx.as_fd(), PollFlags::POLLIN),
            ];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => return Ok(()),
                Err(e) => return Err(InputError::Io(io::Error::from(e))),
            }
            let ready = |fd: &PollFd<'_>| {
                fd.revents().is_some_and(|r| {
                    r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
                })
            };
            (ready(&fds[0]), ready(&fds[1]))
        };
        if woken {
            Self::drain_wakes(wake_rx);
        }
        if input_ready {
            self.read_input(queue)?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.wake_rx.take().is_some() {
            tracing::debug!("reactive input stopped");
        }
    }
}
