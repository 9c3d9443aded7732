#![forbid(unsafe_code)]

//! Cooperative stop signal for background input workers.
//!
//! The shutdown path owns a [`StopSource`]; each worker owns a [`StopToken`]
//! and checks it between bounded waits. [`StopToken::sleep`] doubles as the
//! worker's idle sleep: it returns early the moment a stop is requested, so
//! shutdown never waits out a full poll interval.
//!
//! ```
//! use tuiloop_core::stop::StopSource;
//! use std::time::Duration;
//!
//! let source = StopSource::new();
//! let token = source.token();
//! let worker = std::thread::spawn(move || {
//!     while !token.sleep(Duration::from_millis(5)) {
//!         // poll the host...
//!     }
//! });
//! source.stop();
//! worker.join().unwrap();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use web_time::{Duration, Instant};

struct Shared {
    stopped: AtomicBool,
    wake: (Mutex<()>, Condvar),
}

/// The control side. Dropping it does not stop anything.
pub struct StopSource {
    shared: Arc<Shared>,
}

/// The worker side. Cheap to clone, `Send + Sync`.
#[derive(Clone)]
pub struct StopToken {
    shared: Arc<Shared>,
}

impl StopSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                stopped: AtomicBool::new(false),
                wake: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    #[must_use]
    pub fn token(&self) -> StopToken {
        StopToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Request a stop and wake every sleeping token. Idempotent.
    pub fn stop(&self) {
        self.shared.stopped.store(true, Ordering::Release);
        let (lock, cvar) = &self.shared.wake;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }
}

impl Default for StopSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StopToken {
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Sleep for up to `duration`. Returns `true` if a stop was requested.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        let deadline = Instant::now() + duration;
        let (lock, cvar) = &self.shared.wake;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if self.is_stopped() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            guard = cvar
                .wait_timeout(guard, remaining)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl std::fmt::Debug for StopSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSource")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
