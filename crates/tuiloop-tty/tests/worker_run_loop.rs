//! `Application::run` over the polling worker.
//!
//! 1. **Worker exits first** - on end of transmission and on interrupt, the
//!    worker thread has finished before the terminal attributes are written
//!    back, and the terminal sees exactly two attribute writes.
//! 2. **Input arrives intact** - characters read by the worker reach the
//!    focused element in order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tuiloop_backend::{LocalModes, NotificationSource, Poster, Task, TerminalHost};
use tuiloop_core::error::{TerminalError, ViewError};
use tuiloop_core::event::{Direction, END_OF_TRANSMISSION};
use tuiloop_core::geometry::{Point, Size};
use tuiloop_core::view::{FocusRef, Focusable, Invalidate, Surface};
use tuiloop_runtime::headless::HeadlessHost;
use tuiloop_runtime::{AppConfig, Application, Host, ShutdownReason};
use tuiloop_tty::keymap::vk;
use tuiloop_tty::{ConsoleHost, KeyRecord, PollingWorkerSource, WorkerConfig};

// ═══════════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════════

/// Console replaying fixed batches. Clears `alive` when dropped, which
/// happens as the worker thread returns.
struct ScriptedConsole {
    batches: VecDeque<Vec<KeyRecord>>,
    ready: VecDeque<KeyRecord>,
    alive: Arc<AtomicBool>,
}

impl ScriptedConsole {
    fn new(batches: Vec<Vec<KeyRecord>>) -> (Self, Arc<AtomicBool>) {
        let alive = Arc::new(AtomicBool::new(true));
        let console = Self {
            batches: batches.into(),
            ready: VecDeque::new(),
            alive: Arc::clone(&alive),
        };
        (console, alive)
    }
}

impl ConsoleHost for ScriptedConsole {
    fn pending_records(&mut self) -> io::Result<usize> {
        if self.ready.is_empty()
            && let Some(batch) = self.batches.pop_front()
        {
            self.ready.extend(batch);
        }
        Ok(self.ready.len())
    }

    fn read_record(&mut self) -> io::Result<KeyRecord> {
        self.ready
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
    }
}

impl Drop for ScriptedConsole {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Headless terminal that notes, at every attribute write, whether the
/// worker's console was still alive.
struct WatchedTerminal {
    inner: HeadlessHost,
    worker_alive: Arc<AtomicBool>,
    writes: Rc<RefCell<Vec<(LocalModes, bool)>>>,
}

impl TerminalHost for WatchedTerminal {
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        self.inner.size()
    }

    fn local_modes(&self) -> Result<LocalModes, TerminalError> {
        self.inner.local_modes()
    }

    fn set_local_modes(&mut self, modes: LocalModes) -> Result<(), TerminalError> {
        let alive = self.worker_alive.load(Ordering::SeqCst);
        self.writes.borrow_mut().push((modes, alive));
        self.inner.set_local_modes(modes)
    }
}

/// Posts one interrupt shortly after starting.
#[derive(Default)]
struct DelayedInterrupt {
    thread: Option<JoinHandle<()>>,
}

impl NotificationSource for DelayedInterrupt {
    fn start(&mut self, poster: Poster) -> Result<(), TerminalError> {
        self.thread = Some(thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            poster.post(Task::Interrupt);
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[derive(Default)]
struct Echo {
    seen: String,
}

impl Focusable for Echo {
    fn handle_event(&mut self, c: char, _cx: &mut dyn Invalidate) {
        self.seen.push(c);
    }

    fn resign_focus(&mut self, _cx: &mut dyn Invalidate) {}

    fn become_focus(&mut self, _cx: &mut dyn Invalidate) {}

    fn neighbor(&self, _direction: Direction, _origin: Point) -> Option<FocusRef> {
        None
    }
}

struct Single(Rc<RefCell<Echo>>);

impl Surface for Single {
    fn layout(&mut self, _size: Size) {}

    fn draw(&mut self) -> Result<(), ViewError> {
        Ok(())
    }

    fn update(&mut self) -> Result<(), ViewError> {
        Ok(())
    }

    fn invalidate_size_cache(&mut self) {}

    fn first_focusable(&self) -> Option<FocusRef> {
        let echo = self.0.clone();
        Some(echo)
    }
}

fn fast() -> WorkerConfig {
    WorkerConfig {
        poll_interval: Duration::from_millis(1),
        escape_timeout: Duration::from_millis(20),
    }
}

fn letter(c: char) -> KeyRecord {
    KeyRecord::down(c.to_ascii_uppercase() as u16, Some(c))
}

fn ctrl_d() -> KeyRecord {
    KeyRecord::down(vk::KEY_A + 3, Some(END_OF_TRANSMISSION))
}

struct Run {
    host: HeadlessHost,
    echo: Rc<RefCell<Echo>>,
    writes: Rc<RefCell<Vec<(LocalModes, bool)>>>,
    reason: Option<ShutdownReason>,
}

fn run(batches: Vec<Vec<KeyRecord>>, notifications: Box<dyn NotificationSource>) -> Run {
    let host = HeadlessHost::new(80, 24);
    let (console, alive) = ScriptedConsole::new(batches);
    let writes = Rc::new(RefCell::new(Vec::new()));
    let parts = Host {
        terminal: Box::new(WatchedTerminal {
            inner: host.clone(),
            worker_alive: alive,
            writes: Rc::clone(&writes),
        }),
        input: Box::new(PollingWorkerSource::new(console, fast())),
        notifications,
    };
    let echo = Rc::new(RefCell::new(Echo::default()));
    let mut app =
        Application::new(parts, Box::new(Single(echo.clone())), AppConfig::default()).unwrap();
    app.run().unwrap();
    let reason = app.shutdown_reason();
    drop(app);
    Run {
        host,
        echo,
        writes,
        reason,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shutdown ordering
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn end_of_transmission_restores_after_worker_exit() {
    let host = HeadlessHost::new(80, 24);
    let result = run(
        vec![vec![letter('h'), letter('i'), ctrl_d(), letter('x')]],
        Box::new(host.notifications()),
    );
    assert_eq!(result.reason, Some(ShutdownReason::EndOfTransmission));
    assert_eq!(result.echo.borrow().seen, "hi");
    assert_eq!(
        *result.writes.borrow(),
        vec![(LocalModes::empty(), true), (LocalModes::all(), false)]
    );
    assert_eq!(result.host.mode_writes(), 2);
    assert_eq!(result.host.modes(), LocalModes::all());
}

#[test]
fn interrupt_restores_after_worker_exit() {
    let result = run(vec![], Box::new(DelayedInterrupt::default()));
    assert_eq!(result.reason, Some(ShutdownReason::Interrupt));
    assert_eq!(
        *result.writes.borrow(),
        vec![(LocalModes::empty(), true), (LocalModes::all(), false)]
    );
    assert_eq!(result.host.mode_writes(), 2);
}

#[test]
fn arrow_after_escape_reaches_the_loop_as_navigation() {
    let host = HeadlessHost::new(80, 24);
    let esc = KeyRecord::down(vk::ESCAPE, Some('\u{1b}'));
    let result = run(
        vec![vec![esc, KeyRecord::down(vk::RIGHT, None), letter('k'), ctrl_d()]],
        Box::new(host.notifications()),
    );
    // The lone escape and the arrow are consumed; only `k` is forwarded.
    assert_eq!(result.echo.borrow().seen, "k");
}
