#![forbid(unsafe_code)]

use tuiloop_core::arrow::{ArrowDecoder, ArrowKeyParser};
use tuiloop_core::event::END_OF_TRANSMISSION;
use tuiloop_core::view::Invalidate;

use crate::focus::FocusNavigator;

/// What the run loop should do after a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    /// An end-of-transmission character was seen.
    Shutdown,
}

/// Routes input characters: arrow sequences to the focus navigator,
/// end-of-transmission to shutdown, everything else to the focused element.
pub struct InputDispatcher {
    decoder: Box<dyn ArrowDecoder>,
    halted: bool,
    dropped: u64,
}

impl InputDispatcher {
    #[must_use]
    pub fn new(decoder: Box<dyn ArrowDecoder>) -> Self {
        Self {
            decoder,
            halted: false,
            dropped: 0,
        }
    }

    /// Whether end-of-transmission has been dispatched.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Characters discarded because nothing held focus.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Process `chunk` in order. Once end-of-transmission has been seen, the
    /// rest of the chunk and every later chunk are ignored.
    pub fn dispatch(
        &mut self,
        chunk: &str,
        focus: &mut FocusNavigator,
        cx: &mut dyn Invalidate,
    ) -> Dispatch {
        if self.halted {
            return Dispatch::Shutdown;
        }
        for c in chunk.chars() {
            if self.decoder.parse(c) {
                if let Some(direction) = self.decoder.take_direction() {
                    focus.navigate(direction, cx);
                }
                continue;
            }
            if c == END_OF_TRANSMISSION {
                self.halted = true;
                return Dispatch::Shutdown;
            }
            match focus.focused() {
                Some(element) => element.borrow_mut().handle_event(c, cx),
                None => self.dropped += 1,
            }
        }
        Dispatch::Continue
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(Box::new(ArrowKeyParser::new()))
    }
}

impl std::fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("halted", &self.halted)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}
