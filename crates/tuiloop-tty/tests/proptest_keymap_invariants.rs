//! Property-based tests for console key translation.
//!
//! 1. **Releases are silent** - no key-up record ever produces output.
//!
//! 2. **Arrows decode back** - the escape triple emitted for an arrow record
//!    is decoded by the stock arrow parser into the same direction, with every
//!    character consumed.
//!
//! 3. **Letters are letters** - a key-down letter record without a character
//!    always produces the lowercase ASCII letter.
//!
//! 4. **Closed alphabet** - whatever the record, the output stays inside the
//!    characters the dispatcher understands.

use proptest::prelude::*;
use tuiloop_core::arrow::{ArrowDecoder, ArrowKeyParser};
use tuiloop_core::event::{DELETE, Direction};
use tuiloop_tty::keymap::{KeyOutput, KeyRecord, translate_record, vk};

fn arrow_key(dir: Direction) -> u16 {
    match dir {
        Direction::Up => vk::UP,
        Direction::Down => vk::DOWN,
        Direction::Right => vk::RIGHT,
        Direction::Left => vk::LEFT,
    }
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn key_up_never_produces_output(code in any::<u16>(), c in proptest::option::of(any::<char>())) {
        let record = KeyRecord { key_down: false, virtual_key: code, unicode: c };
        prop_assert_eq!(translate_record(&record), None);
    }

    #[test]
    fn arrow_triples_decode_to_the_same_direction(dir in direction()) {
        let out = translate_record(&KeyRecord::down(arrow_key(dir), None));
        prop_assert_eq!(out, Some(KeyOutput::Arrow(dir)));

        let mut chunk = String::new();
        if let Some(out) = out {
            out.push_to(&mut chunk);
        }
        let mut parser = ArrowKeyParser::new();
        let mut decoded = Vec::new();
        for c in chunk.chars() {
            prop_assert!(parser.parse(c));
            decoded.extend(parser.take_direction());
        }
        prop_assert_eq!(decoded, vec![dir]);
    }

    #[test]
    fn bare_letters_are_lowercase(code in vk::KEY_A..=vk::KEY_Z) {
        let expected = char::from(code as u8).to_ascii_lowercase();
        prop_assert_eq!(
            translate_record(&KeyRecord::down(code, None)),
            Some(KeyOutput::Char(expected))
        );
    }

    #[test]
    fn output_stays_in_the_dispatch_alphabet(code in 0u16..0x100) {
        let record = KeyRecord::down(code, None);
        let mut chunk = String::new();
        if let Some(out) = translate_record(&record) {
            out.push_to(&mut chunk);
        }
        for c in chunk.chars() {
            prop_assert!(
                c.is_ascii_alphanumeric()
                    || matches!(c, ' ' | '\n' | '[' | '\u{1b}')
                    || c == DELETE,
                "unexpected {:?} for vk {:#x}", c, code
            );
        }
    }
}
