#![forbid(unsafe_code)]

//! Process-wide startup/shutdown state machine.
//!
//! ```text
//! Uninitialized ──start──▶ Running ──begin_shutdown──▶ ShuttingDown ──terminate──▶ Terminated
//! ```
//!
//! Every transition is one-way. Attempting one from the wrong phase is
//! refused and reported as `false`, which is what makes the shutdown path
//! safe to reach from several triggers.

use std::fmt;

/// Where the application is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Uninitialized,
    /// Terminal raw, input sources active.
    Running,
    /// Stop signalled to input sources; terminal not yet restored.
    ShuttingDown,
    /// Terminal restored. Final.
    Terminated,
}

/// What started the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownReason {
    /// An end-of-transmission character was dispatched.
    EndOfTransmission,
    /// The host delivered an interrupt.
    Interrupt,
    /// The terminal size could not be determined.
    FatalSize,
    /// The input source failed irrecoverably.
    InputFailure,
    /// The application was dropped while running.
    Dropped,
}

impl ShutdownReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EndOfTransmission => "end_of_transmission",
            Self::Interrupt => "interrupt",
            Self::FatalSize => "fatal_size",
            Self::InputFailure => "input_failure",
            Self::Dropped => "dropped",
        }
    }

    /// Whether the shutdown ends the process with a success status.
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::EndOfTransmission | Self::Interrupt | Self::Dropped)
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
    reason: Option<ShutdownReason>,
}

impl Lifecycle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            reason: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn reason(&self) -> Option<ShutdownReason> {
        self.reason
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// `Uninitialized → Running`.
    pub fn start(&mut self) -> bool {
        self.advance(Phase::Uninitialized, Phase::Running)
    }

    /// `Running → ShuttingDown`, recording the first reason only.
    pub fn begin_shutdown(&mut self, reason: ShutdownReason) -> bool {
        if !self.advance(Phase::Running, Phase::ShuttingDown) {
            return false;
        }
        self.reason = Some(reason);
        true
    }

    /// `ShuttingDown → Terminated`.
    pub fn terminate(&mut self) -> bool {
        self.advance(Phase::ShuttingDown, Phase::Terminated)
    }

    fn advance(&mut self, from: Phase, to: Phase) -> bool {
        if self.phase != from {
            tracing::trace!(phase = ?self.phase, target_phase = ?to, "lifecycle transition refused");
            return false;
        }
        self.phase = to;
        true
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
