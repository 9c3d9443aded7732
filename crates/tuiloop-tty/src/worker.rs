#![forbid(unsafe_code)]

//! Polling-worker input strategy.
//!
//! A dedicated thread polls a [`ConsoleHost`] for key records, translates
//! them, and posts each batch to the run queue as one [`Task::Input`]. The
//! thread never touches runtime state: posting is its only side effect.
//!
//! # Shutdown
//!
//! [`PollingWorkerSource::stop`] sets the stop signal and blocks until the
//! thread has observed it and exited. The worker only ever reads a record
//! the console reports as pending, and idles in [`StopToken::sleep`], so it
//! notices the signal within one poll interval.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tuiloop_backend::{InputSource, InputStrategy, Poster, RunQueue, Task};
use tuiloop_core::error::InputError;
use tuiloop_core::event::{CSI_BRACKET, Direction, ESCAPE};
use tuiloop_core::stop::{StopSource, StopToken};

use crate::keymap::{KeyOutput, KeyRecord, translate_record};

/// Host console input, as seen from the worker thread.
pub trait ConsoleHost: Send + 'static {
    /// Number of records that can be read without blocking.
    fn pending_records(&mut self) -> io::Result<usize>;

    /// Read one record, blocking until one is available.
    fn read_record(&mut self) -> io::Result<KeyRecord>;
}

/// Worker timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Idle sleep between console polls.
    pub poll_interval: Duration,
    /// How long to wait for the rest of an escape sequence.
    pub escape_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            escape_timeout: Duration::from_millis(100),
        }
    }
}

/// [`InputSource`] backed by a background polling thread.
pub struct PollingWorkerSource<C: ConsoleHost> {
    console: Option<C>,
    config: WorkerConfig,
    stop: StopSource,
    thread: Option<JoinHandle<()>>,
}

impl<C: ConsoleHost> PollingWorkerSource<C> {
    #[must_use]
    pub fn new(console: C, config: WorkerConfig) -> Self {
        Self {
            console: Some(console),
            config,
            stop: StopSource::new(),
            thread: None,
        }
    }

    /// Whether the worker thread is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl<C: ConsoleHost> InputSource for PollingWorkerSource<C> {
    fn strategy(&self) -> InputStrategy {
        InputStrategy::PollingWorker
    }

    fn start(&mut self, queue: &mut RunQueue) -> Result<(), InputError> {
        let Some(console) = self.console.take() else {
            return Ok(());
        };
        let poster = queue.poster();
        let token = self.stop.token();
        let config = self.config;
        let handle = thread::Builder::new()
            .name("tuiloop-input".into())
            .spawn(move || run_worker(console, &poster, &token, config))?;
        tracing::debug!(
            poll_ms = config.poll_interval.as_millis() as u64,
            "input worker started"
        );
        self.thread = Some(handle);
        Ok(())
    }

    fn park(&mut self, queue: &mut RunQueue) -> Result<(), InputError> {
        queue.wait()
    }

    fn stop(&mut self) {
        self.stop.stop();
        let Some(handle) = self.thread.take() else {
            return;
        };
        while !handle.is_finished() {
            thread::sleep(self.config.poll_interval);
        }
        match handle.join() {
            Ok(()) => tracing::debug!("input worker exited"),
            Err(_) => tracing::error!(error = %InputError::WorkerPanicked, "input worker exited"),
        }
    }
}

impl<C: ConsoleHost> Drop for PollingWorkerSource<C> {
    fn drop(&mut self) {
        InputSource::stop(self);
    }
}

fn run_worker<C: ConsoleHost>(
    mut console: C,
    poster: &Poster,
    token: &StopToken,
    config: WorkerConfig,
) {
    while !token.is_stopped() {
        match drain_console(&mut console, token, config) {
            Ok(chunk) if chunk.is_empty() => {
                if token.sleep(config.poll_interval) {
                    break;
                }
            }
            Ok(chunk) => {
                if !poster.post(Task::Input(chunk)) {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "console read failed");
                if token.sleep(config.poll_interval) {
                    break;
                }
            }
        }
    }
}

/// Read and translate every pending record into one chunk.
fn drain_console<C: ConsoleHost>(
    console: &mut C,
    token: &StopToken,
    config: WorkerConfig,
) -> io::Result<String> {
    let mut chunk = String::new();
    let mut carried: Option<KeyRecord> = None;
    loop {
        let record = match carried.take() {
            Some(record) => record,
            None if console.pending_records()? > 0 => console.read_record()?,
            None => break,
        };
        match translate_record(&record) {
            Some(KeyOutput::Escape) => {
                chunk.push(ESCAPE);
                carried = read_escape_tail(console, token, config, &mut chunk)?;
            }
            Some(key) => key.push_to(&mut chunk),
            None => {}
        }
    }
    Ok(chunk)
}

/// Append the `[` and final character following an escape key, if they
/// arrive within `escape_timeout`. The characters are taken verbatim so the
/// arrow decoder sees the sequence exactly as the terminal sent it.
///
/// A record that cannot continue the sequence ends it and is handed back for
/// ordinary translation.
fn read_escape_tail<C: ConsoleHost>(
    console: &mut C,
    token: &StopToken,
    config: WorkerConfig,
    chunk: &mut String,
) -> io::Result<Option<KeyRecord>> {
    let deadline = Instant::now() + config.escape_timeout;
    let mut taken = 0;
    while taken < 2 {
        if console.pending_records()? == 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || token.sleep(remaining.min(config.poll_interval)) {
                break;
            }
            continue;
        }
        let record = console.read_record()?;
        if !record.key_down {
            continue;
        }
        let continues = record.unicode.filter(|&c| match taken {
            0 => c == CSI_BRACKET,
            _ => Direction::from_final_char(c).is_some(),
        });
        let Some(c) = continues else {
            return Ok(Some(record));
        };
        chunk.push(c);
        taken += 1;
    }
    Ok(None)
}
