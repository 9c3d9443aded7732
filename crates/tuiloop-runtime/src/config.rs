#![forbid(unsafe_code)]

//! Application configuration.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `TUILOOP_INPUT` | string | `auto` | `auto`, `reactive`, or `worker` |
//! | `TUILOOP_POLL_INTERVAL_MS` | u64 | 10 | Worker idle sleep |
//! | `TUILOOP_ESCAPE_TIMEOUT_MS` | u64 | 100 | Wait for an escape sequence tail |
//! | `TUILOOP_RESTORE_ON_FATAL` | bool | true | Restore the terminal on a fatal size failure |
//!
//! Values are clamped by [`AppConfig::validated`].

use std::time::Duration;

const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
const MIN_POLL_INTERVAL_MS: u64 = 1;
const MAX_POLL_INTERVAL_MS: u64 = 250;

const DEFAULT_ESCAPE_TIMEOUT_MS: u64 = 100;
const MIN_ESCAPE_TIMEOUT_MS: u64 = 10;
const MAX_ESCAPE_TIMEOUT_MS: u64 = 1000;

const DEFAULT_READ_BUFFER: usize = 1024;
const MIN_READ_BUFFER: usize = 16;
const MAX_READ_BUFFER: usize = 65536;

/// Which input strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputChoice {
    /// Decide at startup from the environment.
    #[default]
    Auto,
    /// Wait on the input descriptor from the main sequencing point.
    Reactive,
    /// Poll the console from a background worker.
    PollingWorker,
}

impl InputChoice {
    /// Parse a `TUILOOP_INPUT` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "reactive" | "fd" => Some(Self::Reactive),
            "worker" | "polling" | "polling-worker" => Some(Self::PollingWorker),
            _ => None,
        }
    }
}

/// Run-loop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Input strategy. Default: [`InputChoice::Auto`].
    pub input: InputChoice,

    /// Idle sleep of the polling worker between console polls.
    /// Default: 10ms.
    pub poll_interval: Duration,

    /// How long the polling worker waits for the rest of an escape
    /// sequence. Default: 100ms.
    pub escape_timeout: Duration,

    /// Bytes per read for the reactive strategy. Default: 1024.
    pub read_buffer: usize,

    /// Whether a fatal terminal-size failure still stops input and restores
    /// the terminal before the error is returned. Default: true.
    pub restore_on_fatal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputChoice::Auto,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            escape_timeout: Duration::from_millis(DEFAULT_ESCAPE_TIMEOUT_MS),
            read_buffer: DEFAULT_READ_BUFFER,
            restore_on_fatal: true,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_input(mut self, input: InputChoice) -> Self {
        self.input = input;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer = bytes;
        self
    }

    #[must_use]
    pub fn with_restore_on_fatal(mut self, restore: bool) -> Self {
        self.restore_on_fatal = restore;
        self
    }

    /// Load config from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config through `lookup`, which maps a variable name to its value.
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("TUILOOP_INPUT") {
            match InputChoice::parse(&val) {
                Some(choice) => config.input = choice,
                None => tracing::warn!(value = %val, "ignoring unknown TUILOOP_INPUT"),
            }
        }

        if let Some(val) = lookup("TUILOOP_POLL_INTERVAL_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Some(val) = lookup("TUILOOP_ESCAPE_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.escape_timeout = Duration::from_millis(ms);
        }

        if let Some(val) = lookup("TUILOOP_RESTORE_ON_FATAL") {
            config.restore_on_fatal = !(val == "0" || val.eq_ignore_ascii_case("false"));
        }

        config.validated()
    }

    /// Clamp every value into its supported range.
    ///
    /// ```
    /// use std::time::Duration;
    /// use tuiloop_runtime::AppConfig;
    ///
    /// let config = AppConfig::default()
    ///     .with_poll_interval(Duration::ZERO)
    ///     .validated();
    /// assert_eq!(config.poll_interval, Duration::from_millis(1));
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        let poll_ms = self.poll_interval.as_millis() as u64;
        self.poll_interval =
            Duration::from_millis(poll_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS));

        let escape_ms = self.escape_timeout.as_millis() as u64;
        self.escape_timeout =
            Duration::from_millis(escape_ms.clamp(MIN_ESCAPE_TIMEOUT_MS, MAX_ESCAPE_TIMEOUT_MS));

        self.read_buffer = self.read_buffer.clamp(MIN_READ_BUFFER, MAX_READ_BUFFER);
        self
    }
}
