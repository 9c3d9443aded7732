#![forbid(unsafe_code)]

//! Headless host for driving [`Application`](crate::Application) without a
//! terminal.
//!
//! [`HeadlessHost`] is a [`TerminalHost`] whose size and attribute state live
//! in shared memory, with a journal of what the run loop did to it.
//! [`ScriptedInput`] replays a fixed script, one [`Step`] per park, and
//! [`NullNotifications`] never fires. All three share one journal so tests
//! can check the order of shutdown actions.
//!
//! ```
//! use tuiloop_runtime::headless::{HeadlessHost, Step};
//! use tuiloop_runtime::{AppConfig, Application};
//! # use tuiloop_core::error::ViewError;
//! # use tuiloop_core::geometry::Size;
//! # use tuiloop_core::view::{FocusRef, Surface};
//! # struct Blank;
//! # impl Surface for Blank {
//! #     fn layout(&mut self, _: Size) {}
//! #     fn draw(&mut self) -> Result<(), ViewError> { Ok(()) }
//! #     fn update(&mut self) -> Result<(), ViewError> { Ok(()) }
//! #     fn invalidate_size_cache(&mut self) {}
//! #     fn first_focusable(&self) -> Option<FocusRef> { None }
//! # }
//!
//! let host = HeadlessHost::new(80, 24);
//! let parts = host.parts([Step::input("hi"), Step::input("\u{4}")]);
//! let mut app = Application::new(parts, Box::new(Blank), AppConfig::default()).unwrap();
//! app.run().unwrap();
//! assert_eq!(host.mode_writes(), 2);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use tuiloop_backend::{
    InputSource, InputStrategy, LocalModes, NotificationSource, Poster, RunQueue, Task,
    TerminalHost,
};
use tuiloop_core::error::{InputError, TerminalError};
use tuiloop_core::event::END_OF_TRANSMISSION;

use crate::app::Host;

/// Something the run loop did to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    ModesSet(LocalModes),
    InputStarted,
    InputStopped,
    NotificationsStarted,
    NotificationsStopped,
}

#[derive(Debug)]
struct HostState {
    /// `None` makes the size query fail.
    size: Option<(u16, u16)>,
    modes: LocalModes,
    journal: Vec<HostEvent>,
}

/// In-memory terminal. Clones share state.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    /// A cooked-mode terminal of `cols` x `rows`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                size: Some((cols, rows)),
                modes: LocalModes::all(),
                journal: Vec::new(),
            })),
        }
    }

    pub fn set_size(&self, cols: u16, rows: u16) {
        self.state.borrow_mut().size = Some((cols, rows));
    }

    /// Make every later size query fail.
    pub fn break_size_query(&self) {
        self.state.borrow_mut().size = None;
    }

    #[must_use]
    pub fn modes(&self) -> LocalModes {
        self.state.borrow().modes
    }

    #[must_use]
    pub fn journal(&self) -> Vec<HostEvent> {
        self.state.borrow().journal.clone()
    }

    /// Number of attribute writes so far.
    #[must_use]
    pub fn mode_writes(&self) -> usize {
        self.state
            .borrow()
            .journal
            .iter()
            .filter(|e| matches!(e, HostEvent::ModesSet(_)))
            .count()
    }

    fn record(&self, event: HostEvent) {
        self.state.borrow_mut().journal.push(event);
    }

    /// Input source replaying `script` against this host.
    #[must_use]
    pub fn scripted_input(&self, script: impl IntoIterator<Item = Step>) -> ScriptedInput {
        ScriptedInput {
            host: self.clone(),
            script: script.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn notifications(&self) -> NullNotifications {
        NullNotifications { host: self.clone() }
    }

    /// A full [`Host`] around this terminal and `script`.
    #[must_use]
    pub fn parts(&self, script: impl IntoIterator<Item = Step>) -> Host {
        Host {
            terminal: Box::new(self.clone()),
            input: Box::new(self.scripted_input(script)),
            notifications: Box::new(self.notifications()),
        }
    }
}

impl TerminalHost for HeadlessHost {
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        self.state.borrow().size.ok_or_else(|| {
            TerminalError::SizeQuery(io::Error::new(
                io::ErrorKind::Unsupported,
                "headless size query disabled",
            ))
        })
    }

    fn local_modes(&self) -> Result<LocalModes, TerminalError> {
        Ok(self.modes())
    }

    fn set_local_modes(&mut self, modes: LocalModes) -> Result<(), TerminalError> {
        self.state.borrow_mut().modes = modes;
        self.record(HostEvent::ModesSet(modes));
        Ok(())
    }
}

/// One scripted host action, performed when the run loop parks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Queue these tasks together, before the loop drains again.
    Post(Vec<Task>),
    /// Change the terminal size, then queue a resize notification.
    Resize { cols: u16, rows: u16 },
    /// Break the size query, then queue a resize notification.
    BrokenResize,
}

impl Step {
    #[must_use]
    pub fn input(chunk: &str) -> Self {
        Self::Post(vec![Task::Input(chunk.to_string())])
    }

    /// Several chunks that arrive before any is processed.
    #[must_use]
    pub fn inputs(chunks: &[&str]) -> Self {
        Self::Post(chunks.iter().map(|c| Task::Input((*c).to_string())).collect())
    }

    #[must_use]
    pub fn interrupt() -> Self {
        Self::Post(vec![Task::Interrupt])
    }

    #[must_use]
    pub fn end_of_transmission() -> Self {
        Self::Post(vec![Task::Input(END_OF_TRANSMISSION.to_string())])
    }
}

/// [`InputSource`] that replays a script, one step per park.
///
/// Parking with an exhausted script fails with
/// [`InputError::Disconnected`], so a script that never shuts down ends the
/// run instead of hanging it.
#[derive(Debug)]
pub struct ScriptedInput {
    host: HeadlessHost,
    script: VecDeque<Step>,
}

impl InputSource for ScriptedInput {
    fn strategy(&self) -> InputStrategy {
        InputStrategy::Reactive
    }

    fn start(&mut self, _queue: &mut RunQueue) -> Result<(), InputError> {
        self.host.record(HostEvent::InputStarted);
        Ok(())
    }

    fn park(&mut self, queue: &mut RunQueue) -> Result<(), InputError> {
        let Some(step) = self.script.pop_front() else {
            return Err(InputError::Disconnected);
        };
        match step {
            Step::Post(tasks) => tasks.into_iter().for_each(|t| queue.defer(t)),
            Step::Resize { cols, rows } => {
                self.host.set_size(cols, rows);
                queue.defer(Task::Resize);
            }
            Step::BrokenResize => {
                self.host.break_size_query();
                queue.defer(Task::Resize);
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.host.record(HostEvent::InputStopped);
    }
}

/// [`NotificationSource`] that never notifies.
#[derive(Debug)]
pub struct NullNotifications {
    host: HeadlessHost,
}

impl NotificationSource for NullNotifications {
    fn start(&mut self, _poster: Poster) -> Result<(), TerminalError> {
        self.host.record(HostEvent::NotificationsStarted);
        Ok(())
    }

    fn stop(&mut self) {
        self.host.record(HostEvent::NotificationsStopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_follows_script_state() {
        let host = HeadlessHost::new(80, 24);
        assert_eq!(host.size().unwrap(), (80, 24));
        host.set_size(120, 40);
        assert_eq!(host.size().unwrap(), (120, 40));
        host.break_size_query();
        assert!(matches!(host.size(), Err(TerminalError::SizeQuery(_))));
    }

    #[test]
    fn clones_share_attribute_state() {
        let host = HeadlessHost::new(80, 24);
        let mut other = host.clone();
        other.set_local_modes(LocalModes::empty()).unwrap();
        assert_eq!(host.modes(), LocalModes::empty());
        assert_eq!(host.journal(), vec![HostEvent::ModesSet(LocalModes::empty())]);
    }

    #[test]
    fn script_plays_one_step_per_park() {
        let host = HeadlessHost::new(80, 24);
        let mut input = host.scripted_input([Step::inputs(&["ab", "cd"]), Step::interrupt()]);
        let mut queue = RunQueue::new();
        input.park(&mut queue).unwrap();
        assert_eq!(queue.pop(), Some(Task::Input("ab".into())));
        assert_eq!(queue.pop(), Some(Task::Input("cd".into())));
        assert_eq!(queue.pop(), None);
        input.park(&mut queue).unwrap();
        assert_eq!(queue.pop(), Some(Task::Interrupt));
        assert!(matches!(input.park(&mut queue), Err(InputError::Disconnected)));
    }
}
