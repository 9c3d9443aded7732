#![forbid(unsafe_code)]

//! The application context and its run loop.
//!
//! [`Application`] owns every piece of main-sequencing-point state: the
//! window, the focus navigator, the update scheduler, the lifecycle, and the
//! run queue. Host capabilities come in through [`Host`].
//!
//! # Loop
//!
//! ```text
//! start ─▶ forced cycle ─▶ ┌─ drain queue (Input │ Resize │ Interrupt │ RunCycle)
//!                          └─ park in input source ◀─┘
//! ```
//!
//! # Shutdown
//!
//! Every trigger goes through one path: stop input (joining a worker), stop
//! notifications, restore the terminal, drop queued tasks. The path runs at
//! most once; `Drop` runs it if `run` never reached it.

use tuiloop_backend::{InputSource, InputStrategy, NotificationSource, RunQueue, Task, TerminalHost};
use tuiloop_core::arrow::ArrowDecoder;
use tuiloop_core::error::{Error, Result, TerminalError};
use tuiloop_core::geometry::Size;
use tuiloop_core::view::{FocusRef, Invalidate, NodeRef, Surface};

use crate::config::AppConfig;
use crate::dispatcher::{Dispatch, InputDispatcher};
use crate::lifecycle::{Lifecycle, Phase, ShutdownReason};
use crate::scheduler::UpdateScheduler;
use crate::terminal_mode::TerminalMode;
use crate::window::Window;

/// The host capabilities an application runs against.
pub struct Host {
    pub terminal: Box<dyn TerminalHost>,
    pub input: Box<dyn InputSource>,
    pub notifications: Box<dyn NotificationSource>,
}

/// Query the terminal and reject non-positive dimensions.
fn query_size(terminal: &dyn TerminalHost) -> std::result::Result<Size, TerminalError> {
    let (width, height) = terminal.size()?;
    let size = Size::new(width, height);
    if !size.is_positive() {
        return Err(TerminalError::InvalidSize { width, height });
    }
    Ok(size)
}

pub struct Application {
    config: AppConfig,
    terminal: Box<dyn TerminalHost>,
    input: Box<dyn InputSource>,
    notifications: Box<dyn NotificationSource>,
    mode: TerminalMode,
    queue: RunQueue,
    scheduler: UpdateScheduler,
    window: Window,
    dispatcher: InputDispatcher,
    lifecycle: Lifecycle,
    fatal: Option<Error>,
}

impl Application {
    /// Build the application around `surface`.
    ///
    /// Sizes the window from the terminal and gives initial focus to the
    /// surface's first focusable element. Nothing is started yet.
    ///
    /// # Errors
    ///
    /// Fails if the terminal size cannot be determined.
    pub fn new(host: Host, surface: Box<dyn Surface>, config: AppConfig) -> Result<Self> {
        let config = config.validated();
        let size = query_size(host.terminal.as_ref())?;
        let queue = RunQueue::new();
        let mut scheduler = UpdateScheduler::new(queue.deferrer());
        let mut window = Window::new(surface, size);
        let first = window.surface().first_focusable();
        window.focus_mut().focus_initial(first, &mut scheduler);
        tracing::debug!(
            width = size.width,
            height = size.height,
            strategy = %host.input.strategy(),
            "application created"
        );
        Ok(Self {
            config,
            terminal: host.terminal,
            input: host.input,
            notifications: host.notifications,
            mode: TerminalMode::new(),
            queue,
            scheduler,
            window,
            dispatcher: InputDispatcher::default(),
            lifecycle: Lifecycle::new(),
            fatal: None,
        })
    }

    /// Replace the arrow-key decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Box<dyn ArrowDecoder>) -> Self {
        self.dispatcher = InputDispatcher::new(decoder);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn strategy(&self) -> InputStrategy {
        self.input.strategy()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    #[must_use]
    pub fn shutdown_reason(&self) -> Option<ShutdownReason> {
        self.lifecycle.reason()
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn focused(&self) -> Option<FocusRef> {
        self.window.focus().focused()
    }

    /// Mark `node` dirty from outside a collaborator callback.
    pub fn invalidate(&mut self, node: &NodeRef) {
        self.scheduler.invalidate(node);
    }

    /// Run until a shutdown trigger. The terminal has been restored when
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns the fatal terminal-size error, or an input source failure.
    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        while self.lifecycle.is_running() {
            self.drain();
            if !self.lifecycle.is_running() {
                break;
            }
            if let Err(err) = self.input.park(&mut self.queue) {
                tracing::error!(error = %err, "input source failed");
                self.fatal = Some(err.into());
                self.shutdown(ShutdownReason::InputFailure);
            }
        }
        self.finish()
    }

    /// Start if needed, then handle every queued task without parking.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), for whatever the drained tasks trigger.
    pub fn run_until_idle(&mut self) -> Result<()> {
        if self.lifecycle.phase() == Phase::Uninitialized {
            self.start()?;
        }
        self.drain();
        if self.lifecycle.phase() == Phase::Terminated {
            return self.finish();
        }
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if !self.lifecycle.start() {
            return Err(TerminalError::SessionSetup(format!(
                "application cannot start from {:?}",
                self.lifecycle.phase()
            ))
            .into());
        }
        self.mode.enter(self.terminal.as_mut());
        if let Err(err) = self.input.start(&mut self.queue) {
            tracing::error!(error = %err, "input source failed to start");
            self.fatal = Some(err.into());
            self.shutdown(ShutdownReason::InputFailure);
            return self.finish();
        }
        if let Err(err) = self.notifications.start(self.queue.poster()) {
            tracing::warn!(error = %err, "resize and interrupt notifications unavailable");
        }
        tracing::info!(
            strategy = %self.input.strategy(),
            width = self.window.size().width,
            height = self.window.size().height,
            "run loop started"
        );
        self.scheduler.force_cycle(&mut self.window);
        Ok(())
    }

    fn drain(&mut self) {
        while self.lifecycle.is_running() {
            let Some(task) = self.queue.pop() else {
                break;
            };
            self.handle(task);
        }
    }

    fn handle(&mut self, task: Task) {
        match task {
            Task::Input(chunk) => {
                let flow = self.dispatcher.dispatch(
                    &chunk,
                    self.window.focus_mut(),
                    &mut self.scheduler,
                );
                if flow == Dispatch::Shutdown {
                    self.shutdown(ShutdownReason::EndOfTransmission);
                }
            }
            Task::Resize => self.resize(),
            Task::Interrupt => self.shutdown(ShutdownReason::Interrupt),
            Task::RunCycle => {
                self.scheduler.run_scheduled(&mut self.window);
            }
        }
    }

    fn resize(&mut self) {
        match query_size(self.terminal.as_ref()) {
            Ok(size) => {
                tracing::debug!(width = size.width, height = size.height, "terminal resized");
                self.window.resize(size);
                self.scheduler.force_cycle(&mut self.window);
            }
            Err(err) => {
                tracing::error!(error = %err, size = %self.window.size(), "terminal size unusable");
                self.fatal = Some(err.into());
                self.shutdown(ShutdownReason::FatalSize);
            }
        }
    }

    /// The single shutdown path. Safe to reach from any trigger, any number
    /// of times.
    fn shutdown(&mut self, reason: ShutdownReason) {
        if !self.lifecycle.begin_shutdown(reason) {
            return;
        }
        tracing::info!(reason = %reason, "shutting down");
        self.input.stop();
        self.notifications.stop();
        if reason == ShutdownReason::FatalSize && !self.config.restore_on_fatal {
            tracing::warn!("leaving terminal mode as is after fatal size failure");
        } else {
            self.mode.restore(self.terminal.as_mut());
        }
        let dropped = self.queue.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded queued tasks");
        }
        self.lifecycle.terminate();
    }

    fn finish(&mut self) -> Result<()> {
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        if self.lifecycle.is_running() {
            self.shutdown(ShutdownReason::Dropped);
        }
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("phase", &self.lifecycle.phase())
            .field("strategy", &self.input.strategy())
            .field("window", &self.window)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
