#![forbid(unsafe_code)]

//! Arrow-key escape sequence decoding.
//!
//! The run loop feeds every input character through an [`ArrowDecoder`]
//! before anything else sees it. The decoder is a one-character-at-a-time
//! state machine: it reports whether it consumed the character and, once an
//! escape triple (`ESC [ A..D`) completes, exposes the decoded [`Direction`]
//! through a read-once side channel.
//!
//! [`ArrowKeyParser`] is the stock implementation. Applications with richer
//! escape handling plug in their own decoder.

use crate::event::{CSI_BRACKET, Direction, ESCAPE};

/// Decides whether a character continues or ends an arrow-key sequence.
pub trait ArrowDecoder {
    /// Offer one character. Returns `true` if it was consumed as part of a
    /// (possibly incomplete) escape sequence.
    fn parse(&mut self, c: char) -> bool;

    /// Take the completed direction, if the last consumed character finished
    /// a sequence. Clears it.
    fn take_direction(&mut self) -> Option<Direction>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Bracket,
}

/// VT arrow-key decoder (`ESC [ A`, `ESC [ B`, `ESC [ C`, `ESC [ D`).
///
/// A character that breaks a sequence midway is not consumed, so the caller
/// forwards it as ordinary input; the already-consumed prefix is dropped.
#[derive(Debug, Clone, Default)]
pub struct ArrowKeyParser {
    state: State,
    completed: Option<Direction>,
}

impl ArrowKeyParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sequence has started but not completed.
    #[must_use]
    pub fn in_sequence(&self) -> bool {
        self.state != State::Ground
    }
}

impl ArrowDecoder for ArrowKeyParser {
    fn parse(&mut self, c: char) -> bool {
        match (self.state, c) {
            (State::Ground, ESCAPE) | (State::Escape, ESCAPE) => {
                self.state = State::Escape;
                true
            }
            (State::Escape, CSI_BRACKET) => {
                self.state = State::Bracket;
                true
            }
            (State::Bracket, c) => {
                self.state = State::Ground;
                match Direction::from_final_char(c) {
                    Some(dir) => {
                        self.completed = Some(dir);
                        true
                    }
                    None => false,
                }
            }
            (State::Escape, _) => {
                self.state = State::Ground;
                false
            }
            (State::Ground, _) => false,
        }
    }

    fn take_direction(&mut self) -> Option<Direction> {
        self.completed.take()
    }
}
