#![forbid(unsafe_code)]
#![doc = "Host boundary for tuiloop: terminal attributes, input sources, and the run queue."]
#![doc = ""]
#![doc = "This crate defines the seam between the platform-agnostic runtime and the"]
#![doc = "platform-specific implementations in `tuiloop-tty` (or the headless harness"]
#![doc = "in `tuiloop-runtime`). The runtime never touches a file descriptor, a"]
#![doc = "signal, or a thread directly; everything flows through these traits and"]
#![doc = "the [`RunQueue`]."]

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use bitflags::bitflags;
use tuiloop_core::error::{InputError, TerminalError};

bitflags! {
    /// The terminal local-mode bits the run loop toggles.
    ///
    /// Every other terminal attribute is left exactly as the host had it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LocalModes: u8 {
        /// Local echo of typed characters.
        const ECHO   = 0b01;
        /// Canonical (line-buffered) input.
        const ICANON = 0b10;
    }
}

/// Terminal queries and attribute control.
///
/// Implemented by `TtyHost` on Unix and by the headless test host.
pub trait TerminalHost {
    /// Current terminal dimensions (columns, rows).
    fn size(&self) -> Result<(u16, u16), TerminalError>;

    /// Current state of the [`LocalModes`] bits.
    fn local_modes(&self) -> Result<LocalModes, TerminalError>;

    /// Make the [`LocalModes`] bits equal `modes` in a single attribute
    /// write, leaving all other attributes untouched.
    fn set_local_modes(&mut self, modes: LocalModes) -> Result<(), TerminalError>;
}

impl<T: TerminalHost + ?Sized> TerminalHost for Box<T> {
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        (**self).size()
    }

    fn local_modes(&self) -> Result<LocalModes, TerminalError> {
        (**self).local_modes()
    }

    fn set_local_modes(&mut self, modes: LocalModes) -> Result<(), TerminalError> {
        (**self).set_local_modes(modes)
    }
}

// ── Run queue ────────────────────────────────────────────────────────────

/// One unit of deferred work for the main sequencing point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// A chunk of decoded input characters, processed in order.
    Input(String),
    /// The terminal reported a size change.
    Resize,
    /// The host delivered an interrupt.
    Interrupt,
    /// Run the coalesced update cycle.
    RunCycle,
}

/// Wakes a main sequencing point that is blocked outside the run queue
/// (for example in `poll(2)`).
pub trait Waker: Send + Sync {
    fn wake(&self);
}

/// FIFO of [`Task`]s consumed only on the main sequencing point.
///
/// Producers on other threads hold a [`Poster`]. The loop drains with
/// [`pop`](Self::pop) and, once empty, parks in its input source.
pub struct RunQueue {
    tx: mpsc::Sender<Task>,
    rx: mpsc::Receiver<Task>,
    /// A task received by a blocking wait, served before the channel.
    parked: Option<Task>,
    waker: Arc<OnceLock<Box<dyn Waker>>>,
}

impl RunQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            parked: None,
            waker: Arc::new(OnceLock::new()),
        }
    }

    /// A producer handle for background threads.
    #[must_use]
    pub fn poster(&self) -> Poster {
        Poster {
            tx: self.tx.clone(),
            waker: Arc::clone(&self.waker),
        }
    }

    /// A main-thread handle that enqueues like [`defer`](Self::defer).
    #[must_use]
    pub fn deferrer(&self) -> Deferrer {
        Deferrer {
            tx: self.tx.clone(),
        }
    }

    /// Install the waker fired by every [`Poster::post`]. Returns `false` if
    /// one is already installed.
    pub fn set_waker(&self, waker: Box<dyn Waker>) -> bool {
        self.waker.set(waker).is_ok()
    }

    /// Enqueue from the main sequencing point itself. Never wakes: the loop
    /// drains the queue before it parks.
    pub fn defer(&self, task: Task) {
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.tx.send(task);
    }

    /// Next task in FIFO order, without blocking.
    pub fn pop(&mut self) -> Option<Task> {
        self.parked.take().or_else(|| self.rx.try_recv().ok())
    }

    /// Block until a task is available. The task stays queued.
    ///
    /// The queue keeps a sender of its own, so this never observes a
    /// disconnected channel and only returns once a task arrives. Sources
    /// that can run dry (the headless script) report
    /// [`InputError::Disconnected`] themselves.
    pub fn wait(&mut self) -> Result<(), InputError> {
        if self.parked.is_some() {
            return Ok(());
        }
        match self.rx.recv() {
            Ok(task) => {
                self.parked = Some(task);
                Ok(())
            }
            // Unreachable while `self.tx` is alive.
            Err(mpsc::RecvError) => Err(InputError::Disconnected),
        }
    }

    /// Block for at most `timeout`. Returns `true` if a task is available.
    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        if self.parked.is_some() {
            return true;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                self.parked = Some(task);
                true
            }
            Err(_) => false,
        }
    }

    /// Discard everything queued. Returns how many tasks were dropped.
    pub fn clear(&mut self) -> usize {
        let mut dropped = usize::from(self.parked.take().is_some());
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

impl Default for RunQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RunQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunQueue")
            .field("parked", &self.parked)
            .field("has_waker", &self.waker.get().is_some())
            .finish()
    }
}

/// Cloneable, `Send` producer side of a [`RunQueue`].
#[derive(Clone)]
pub struct Poster {
    tx: mpsc::Sender<Task>,
    waker: Arc<OnceLock<Box<dyn Waker>>>,
}

impl Poster {
    /// Marshal a task onto the main sequencing point and wake it.
    ///
    /// Returns `false` if the run queue is gone.
    pub fn post(&self, task: Task) -> bool {
        if self.tx.send(task).is_err() {
            return false;
        }
        if let Some(waker) = self.waker.get() {
            waker.wake();
        }
        true
    }
}

impl fmt::Debug for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster").finish_non_exhaustive()
    }
}

/// Enqueues onto a [`RunQueue`] from the main sequencing point, without
/// waking it.
#[derive(Debug, Clone)]
pub struct Deferrer {
    tx: mpsc::Sender<Task>,
}

impl Deferrer {
    pub fn defer(&self, task: Task) {
        // A closed queue means the loop is gone; nothing is left to run it.
        let _ = self.tx.send(task);
    }
}

// ── Input sources ────────────────────────────────────────────────────────

/// How input reaches the main sequencing point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputStrategy {
    /// The loop itself waits for descriptor readiness and reads.
    Reactive,
    /// A background worker polls the host console and posts characters.
    PollingWorker,
}

impl fmt::Display for InputStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reactive => write!(f, "reactive"),
            Self::PollingWorker => write!(f, "polling-worker"),
        }
    }
}

/// Produces ordered input chunks for the main sequencing point.
///
/// Both strategies deliver [`Task::Input`] through the run queue; the
/// dispatcher never knows which one is active.
pub trait InputSource {
    fn strategy(&self) -> InputStrategy;

    /// Arm the source. May install a [`Waker`] or spawn a worker.
    fn start(&mut self, queue: &mut RunQueue) -> Result<(), InputError>;

    /// Called on the main sequencing point once the queue is empty. Returns
    /// after at least one task may have been queued.
    fn park(&mut self, queue: &mut RunQueue) -> Result<(), InputError>;

    /// Stop producing input. Blocks until any background worker has exited.
    /// Safe to call more than once.
    fn stop(&mut self);
}

/// Source of asynchronous host notifications (resize, interrupt).
pub trait NotificationSource {
    /// Begin forwarding notifications as [`Task::Resize`]/[`Task::Interrupt`].
    fn start(&mut self, poster: Poster) -> Result<(), TerminalError>;

    /// Stop forwarding. Safe to call more than once.
    fn stop(&mut self);
}
