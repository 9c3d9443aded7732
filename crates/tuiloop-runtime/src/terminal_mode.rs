#![forbid(unsafe_code)]

use tuiloop_backend::{LocalModes, TerminalHost};

/// The two bits the run loop owns.
const RAW_MASK: LocalModes = LocalModes::ECHO.union(LocalModes::ICANON);

/// Enters and restores character-at-a-time input on the controlling
/// terminal.
///
/// `enter` clears local echo and canonical mode in one attribute write and
/// remembers their original state. `restore` writes back exactly those two
/// bits, at most once per `enter`. Attribute failures are logged and
/// absorbed: a failed `enter` has changed nothing, so there is nothing to
/// restore.
#[derive(Debug, Default)]
pub struct TerminalMode {
    saved: Option<LocalModes>,
}

impl TerminalMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `enter` succeeded and `restore` has not run yet.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.saved.is_some()
    }

    /// Disable echo and line buffering. Returns `true` on success.
    pub fn enter(&mut self, host: &mut dyn TerminalHost) -> bool {
        if self.saved.is_some() {
            return true;
        }
        let original = match host.local_modes() {
            Ok(modes) => modes,
            Err(err) => {
                tracing::warn!(error = %err, "cannot read terminal attributes; staying in cooked mode");
                return false;
            }
        };
        if let Err(err) = host.set_local_modes(original.difference(RAW_MASK)) {
            tracing::warn!(error = %err, "cannot enter raw input mode");
            return false;
        }
        tracing::debug!(
            echo = original.contains(LocalModes::ECHO),
            icanon = original.contains(LocalModes::ICANON),
            "entered raw input mode"
        );
        self.saved = Some(original);
        true
    }

    /// Put the saved echo and canonical bits back. Returns `true` if a
    /// restore was written by this call.
    pub fn restore(&mut self, host: &mut dyn TerminalHost) -> bool {
        let Some(original) = self.saved.take() else {
            return false;
        };
        match host.set_local_modes(original & RAW_MASK) {
            Ok(()) => {
                tracing::debug!("restored terminal input mode");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot restore terminal input mode");
                false
            }
        }
    }
}
