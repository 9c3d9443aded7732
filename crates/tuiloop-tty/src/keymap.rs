#![forbid(unsafe_code)]

//! Console key records and their translation into the input character stream.
//!
//! A console host reports keys as records carrying a virtual key code (the
//! Windows `VK_*` numbering, which is what console input APIs speak) plus the
//! character the key produced, if any. [`translate_record`] reduces a record
//! to exactly what the dispatcher understands: letters, digits, space,
//! enter, backspace, escape, and the four arrows.

use tuiloop_core::event::{DELETE, Direction, ESCAPE};

/// Virtual key codes understood by [`translate_record`].
pub mod vk {
    pub const BACK: u16 = 0x08;
    pub const RETURN: u16 = 0x0D;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
    pub const DIGIT_0: u16 = 0x30;
    pub const DIGIT_9: u16 = 0x39;
    pub const KEY_A: u16 = 0x41;
    pub const KEY_Z: u16 = 0x5A;
    /// `[{` on a US layout.
    pub const OEM_4: u16 = 0xDB;
}

/// One console input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    /// `true` for a key press, `false` for a release.
    pub key_down: bool,
    pub virtual_key: u16,
    /// The character the key produced, if any.
    pub unicode: Option<char>,
}

impl KeyRecord {
    #[must_use]
    pub const fn down(virtual_key: u16, unicode: Option<char>) -> Self {
        Self {
            key_down: true,
            virtual_key,
            unicode,
        }
    }

    #[must_use]
    pub const fn up(virtual_key: u16) -> Self {
        Self {
            key_down: false,
            virtual_key,
            unicode: None,
        }
    }
}

/// What a record contributes to the character stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutput {
    /// A single character.
    Char(char),
    /// An arrow key; emitted as its escape triple.
    Arrow(Direction),
    /// A bare escape key. The caller assembles the rest of the sequence.
    Escape,
}

impl KeyOutput {
    /// Append this output to `chunk`.
    pub fn push_to(self, chunk: &mut String) {
        match self {
            Self::Char(c) => chunk.push(c),
            Self::Arrow(dir) => chunk.extend(dir.escape_triple()),
            Self::Escape => chunk.push(ESCAPE),
        }
    }
}

/// Translate a console record. Key releases and unmapped keys yield `None`.
#[must_use]
pub fn translate_record(record: &KeyRecord) -> Option<KeyOutput> {
    if !record.key_down {
        return None;
    }
    let out = match record.virtual_key {
        vk::UP => KeyOutput::Arrow(Direction::Up),
        vk::DOWN => KeyOutput::Arrow(Direction::Down),
        vk::RIGHT => KeyOutput::Arrow(Direction::Right),
        vk::LEFT => KeyOutput::Arrow(Direction::Left),
        vk::ESCAPE => KeyOutput::Escape,
        vk::RETURN => KeyOutput::Char('\n'),
        vk::BACK => KeyOutput::Char(DELETE),
        vk::SPACE => KeyOutput::Char(' '),
        code @ vk::DIGIT_0..=vk::DIGIT_9 => KeyOutput::Char(ascii(code)),
        code @ vk::KEY_A..=vk::KEY_Z => match record.unicode {
            // Shifted and control letters carry their own character.
            Some(c) if c != '\0' => KeyOutput::Char(c),
            _ => KeyOutput::Char(ascii(code).to_ascii_lowercase()),
        },
        _ => return None,
    };
    Some(out)
}

fn ascii(code: u16) -> char {
    char::from(u8::try_from(code).unwrap_or(b'?'))
}
