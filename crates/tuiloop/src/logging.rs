#![forbid(unsafe_code)]

//! Log subscriber installation.
//!
//! The terminal belongs to the UI while the loop runs, so logs never go to
//! stdout or stderr. They go to the file named by `TUILOOP_LOG_FILE`, or
//! nowhere.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TUILOOP_LOG` | `info` | `EnvFilter` directives |
//! | `TUILOOP_LOG_FILE` | unset | Log file, appended to; unset disables logging |
//!
//! With the `json-log` feature the file receives one JSON object per event.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directives.
    pub filter: String,
    /// Destination file. `None` disables logging.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` instead of the process environment.
    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(filter) = lookup("TUILOOP_LOG")
            && !filter.trim().is_empty()
        {
            settings.filter = filter;
        }
        if let Some(path) = lookup("TUILOOP_LOG_FILE")
            && !path.trim().is_empty()
        {
            settings.file = Some(PathBuf::from(path));
        }
        settings
    }

    /// The filter, falling back to the default for unparsable directives.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Build a subscriber for `settings` that writes through `writer`.
pub fn subscriber<W>(settings: &LogSettings, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    #[cfg(feature = "json-log")]
    {
        Box::new(builder.json().finish())
    }
    #[cfg(not(feature = "json-log"))]
    {
        Box::new(builder.finish())
    }
}

/// Install the global subscriber described by `settings`.
///
/// Returns `Ok(false)` when no log file is configured, or when another
/// subscriber was installed first.
///
/// # Errors
///
/// Fails if the log file cannot be opened.
pub fn init(settings: &LogSettings) -> io::Result<bool> {
    let Some(path) = &settings.file else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing::subscriber::set_global_default(subscriber(settings, Mutex::new(file)))
        .is_ok();
    if installed {
        tracing::debug!(filter = %settings.filter, path = %path.display(), "logging initialised");
    }
    Ok(installed)
}

/// [`init`] from the process environment. A log file that cannot be opened
/// is reported on stderr and logging stays off.
pub fn init_from_env() -> bool {
    let settings = LogSettings::from_env();
    match init(&settings) {
        Ok(installed) => installed,
        Err(err) => {
            eprintln!("tuiloop: cannot open log file: {err}");
            false
        }
    }
}
