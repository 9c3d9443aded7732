#![forbid(unsafe_code)]

//! Error model.
//!
//! # Design Principles
//!
//! 1. **Few fatal conditions** - only an unusable terminal size halts the run
//!    loop. Attribute failures, empty navigation, and input with nobody to
//!    receive it are absorbed where they happen.
//! 2. **Domain-specific errors** - terminal, input, and view failures have
//!    their own types so callers can match on what matters.
//! 3. **Exit mapping** - [`Error::exit_code`] gives the process status the
//!    facade terminates with.

use std::fmt;

// ── Domain-Specific Error Types ─────────────────────────────────────────

/// Terminal host errors.
#[derive(Debug)]
pub enum TerminalError {
    /// I/O failure on the terminal file descriptor.
    Io(std::io::Error),
    /// The terminal size query itself failed.
    SizeQuery(std::io::Error),
    /// Terminal size query returned non-positive dimensions.
    InvalidSize { width: u16, height: u16 },
    /// Raw mode or signal registration failed.
    SessionSetup(String),
}

/// Input sourcing errors.
#[derive(Debug)]
pub enum InputError {
    /// Reading or polling the input descriptor failed.
    Io(std::io::Error),
    /// The polling worker thread panicked.
    WorkerPanicked,
    /// The input source has nothing left to produce.
    Disconnected,
}

/// Failures reported by view collaborators. Always absorbed by the core.
#[derive(Debug)]
pub enum ViewError {
    /// A node could not apply its new description.
    Update(String),
    /// A render pass failed to reach the terminal.
    Render(std::io::Error),
}

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Terminal host failure.
    Terminal(TerminalError),
    /// Input source failure.
    Input(InputError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type.
pub type Result<T> = std::result::Result<T, Error>;

/// `EX_SOFTWARE` from sysexits(3).
pub const EXIT_FATAL: i32 = 70;

/// `EX_IOERR` from sysexits(3).
pub const EXIT_IO: i32 = 74;

impl Error {
    /// Whether the error came from an unusable terminal size.
    pub fn is_fatal_size(&self) -> bool {
        matches!(
            self,
            Self::Terminal(TerminalError::SizeQuery(_) | TerminalError::InvalidSize { .. })
        )
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal_size() {
            EXIT_FATAL
        } else {
            EXIT_IO
        }
    }

    /// Error type label for tracing fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Terminal(_) => "terminal",
            Self::Input(_) => "input",
            Self::Io(_) => "io",
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O: {err}"),
            Self::SizeQuery(err) => write!(f, "terminal size query failed: {err}"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid terminal size: {width}x{height}")
            }
            Self::SessionSetup(msg) => write!(f, "session setup: {msg}"),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "input I/O: {err}"),
            Self::WorkerPanicked => write!(f, "input worker panicked"),
            Self::Disconnected => write!(f, "input source disconnected"),
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update(msg) => write!(f, "node update failed: {msg}"),
            Self::Render(err) => write!(f, "render failed: {err}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(err) => write!(f, "{err}"),
            Self::Input(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for TerminalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) | Self::SizeQuery(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Update(_) => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Terminal(err) => Some(err),
            Self::Input(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<TerminalError> for Error {
    fn from(err: TerminalError) -> Self {
        Self::Terminal(err)
    }
}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

impl From<std::io::Error> for TerminalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
