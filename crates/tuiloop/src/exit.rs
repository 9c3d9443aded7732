#![forbid(unsafe_code)]

//! Process exit mapping.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | End of transmission, interrupt | 0 |
//! | Unusable terminal size | [`EXIT_FATAL`](tuiloop_core::error::EXIT_FATAL) (70) |
//! | Input or I/O failure | [`EXIT_IO`](tuiloop_core::error::EXIT_IO) (74) |

use std::io::{self, Write};

use tuiloop_core::error::Result;
use tuiloop_runtime::Application;

/// Exit status for a finished run.
#[must_use]
pub fn status(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.exit_code(),
    }
}

/// Write the one-line failure report for `result`, if it failed.
///
/// # Errors
///
/// Propagates write failures.
pub fn report(result: &Result<()>, out: &mut impl Write) -> io::Result<()> {
    if let Err(err) = result {
        writeln!(out, "tuiloop: {err}")?;
    }
    Ok(())
}

/// Run `app` to completion and terminate the process.
///
/// The terminal has been restored by the time this exits. On failure the
/// error is printed to stderr first.
pub fn run_and_exit(mut app: Application) -> ! {
    let result = app.run();
    let code = status(&result);
    if let Err(err) = &result {
        tracing::error!(error = %err, error_type = err.error_type(), code, "run loop failed");
    }
    drop(app);
    let _ = report(&result, &mut io::stderr().lock());
    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuiloop_core::error::{EXIT_FATAL, EXIT_IO, Error, InputError, TerminalError};

    #[test]
    fn clean_run_exits_zero() {
        let result = Ok(());
        assert_eq!(status(&result), 0);
        let mut out = Vec::new();
        report(&result, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn fatal_size_exits_with_software_status() {
        let result = Err(Error::from(TerminalError::InvalidSize {
            width: 0,
            height: 24,
        }));
        assert_eq!(status(&result), EXIT_FATAL);
        let mut out = Vec::new();
        report(&result, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tuiloop: invalid terminal size: 0x24\n"
        );
    }

    #[test]
    fn input_failure_exits_with_io_status() {
        let result = Err(Error::from(InputError::Disconnected));
        assert_eq!(status(&result), EXIT_IO);
    }
}
