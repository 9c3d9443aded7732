#![forbid(unsafe_code)]

//! Canonical input vocabulary.
//!
//! The run loop consumes input as a stream of `char`s. Everything that is not
//! an arrow-key escape triple or end-of-transmission is forwarded verbatim to
//! the focused element, so this module is intentionally small: the four
//! navigation directions and the control characters the core reacts to.

/// End-of-transmission (`Ctrl+D`). Receiving it begins shutdown.
pub const END_OF_TRANSMISSION: char = '\u{4}';

/// Escape, the first character of an escape triple.
pub const ESCAPE: char = '\u{1b}';

/// Control Sequence Introducer bracket, the second character of an escape triple.
pub const CSI_BRACKET: char = '[';

/// Delete, the character terminals send for the backspace key.
pub const DELETE: char = '\u{7f}';

/// A focus navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the top of the screen (`ESC [ A`).
    Up,
    /// Towards the bottom of the screen (`ESC [ B`).
    Down,
    /// Towards the right edge (`ESC [ C`).
    Right,
    /// Towards the left edge (`ESC [ D`).
    Left,
}

impl Direction {
    /// All directions in VT final-byte order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// The final character of the escape triple for this direction.
    #[must_use]
    pub const fn final_char(self) -> char {
        match self {
            Self::Up => 'A',
            Self::Down => 'B',
            Self::Right => 'C',
            Self::Left => 'D',
        }
    }

    /// Parse the final character of an escape triple.
    #[must_use]
    pub const fn from_final_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Up),
            'B' => Some(Self::Down),
            'C' => Some(Self::Right),
            'D' => Some(Self::Left),
            _ => None,
        }
    }

    /// The full escape triple (ESC, `[`, final char).
    #[must_use]
    pub const fn escape_triple(self) -> [char; 3] {
        [ESCAPE, CSI_BRACKET, self.final_char()]
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}
