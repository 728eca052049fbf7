// SPDX-License-Identifier: MIT
//
// Input decoding: one byte-level input unit at a time.
//
// The terminal runs in raw mode, so every key arrives as bytes: printable
// characters as themselves, Ctrl+letter as the control codes 0x01..=0x1A,
// Backspace as DEL, special keys as escape sequences and non-ASCII text as
// UTF-8. `InputDecoder::next` turns the next unit into an `Input`.

use std::io;
use std::time::Duration;

use th_term::reader::{ByteSource, ReadOutcome};

use crate::action::Action;
use crate::escape::Escape;

const ESC: u8 = 0x1B;
const CTRL_Q: u8 = 0x11;
const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7F;

/// One decoded unit of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing arrived within the poll timeout.
    Timeout,
    /// The input stream ended.
    Closed,
    /// Ctrl+Q.
    Quit,
    Action(Action),
    /// Literal text to insert.
    Text(String),
    /// Bytes that mean nothing to us.
    Unmapped,
}

/// Ctrl+letter shortcuts.
#[must_use]
pub const fn control_action(byte: u8) -> Option<Action> {
    let action = match byte {
        0x01 => Action::SelectAll, // A
        0x03 => Action::Copy,      // C
        0x16 => Action::Paste,     // V
        0x18 => Action::Cut,       // X
        0x19 => Action::Redo,      // Y
        0x1A => Action::Undo,      // Z
        _ => return None,
    };
    Some(action)
}

/// Length of a UTF-8 sequence from its lead byte; 0 if `lead` cannot start
/// one.
const fn utf8_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InputDecoder {
    /// How long to wait for the first byte of a unit.
    pub poll_timeout: Duration,
    /// How long to wait for each further byte of an escape sequence or a
    /// multi-byte character.
    pub escape_timeout: Duration,
}

impl InputDecoder {
    #[must_use]
    pub const fn new(poll_timeout: Duration, escape_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            escape_timeout,
        }
    }

    /// Decode the next input unit.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the source.
    pub fn next(&self, source: &mut dyn ByteSource) -> io::Result<Input> {
        let byte = match source.read_byte(self.poll_timeout)? {
            ReadOutcome::Byte(byte) => byte,
            ReadOutcome::Timeout => return Ok(Input::Timeout),
            ReadOutcome::Closed => return Ok(Input::Closed),
        };

        Ok(match byte {
            ESC => Escape::read(source, self.escape_timeout)?
                .action()
                .map_or(Input::Unmapped, Input::Action),
            CTRL_Q => Input::Quit,
            b'\r' | b'\n' => Input::Text("\n".to_owned()),
            b'\t' => Input::Text("\t".to_owned()),
            DEL | BACKSPACE => Input::Action(Action::DeleteLeftCharacter),
            0x00..=0x1F => control_action(byte).map_or(Input::Unmapped, Input::Action),
            0x20..=0x7E => Input::Text(char::from(byte).to_string()),
            _ => self.read_utf8(byte, source)?,
        })
    }

    fn read_utf8(&self, lead: u8, source: &mut dyn ByteSource) -> io::Result<Input> {
        let len = utf8_len(lead);
        if len == 0 {
            return Ok(Input::Unmapped);
        }

        let mut bytes = Vec::with_capacity(len);
        bytes.push(lead);
        while bytes.len() < len {
            match source.read_byte(self.escape_timeout)? {
                ReadOutcome::Byte(byte) if byte & 0xC0 == 0x80 => bytes.push(byte),
                // A non-continuation byte is lost along with the broken
                // character.
                _ => return Ok(Input::Unmapped),
            }
        }

        Ok(String::from_utf8(bytes).map_or(Input::Unmapped, Input::Text))
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_millis(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use th_term::reader::ScriptedSource;

    fn decode_all(mut src: ScriptedSource) -> Vec<Input> {
        let decoder = InputDecoder::default();
        let mut out = Vec::new();
        loop {
            match decoder.next(&mut src).unwrap() {
                Input::Closed => return out,
                input => out.push(input),
            }
        }
    }

    fn text(s: &str) -> Input {
        Input::Text(s.to_owned())
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(decode_all(ScriptedSource::new().bytes(b"a ~")), vec![text("a"), text(" "), text("~")]);
    }

    #[test]
    fn newlines_and_tabs() {
        assert_eq!(
            decode_all(ScriptedSource::new().bytes(b"\r\n\t")),
            vec![text("\n"), text("\n"), text("\t")]
        );
    }

    #[test]
    fn utf8_characters() {
        let src = ScriptedSource::new().bytes("é中🦀".as_bytes());
        assert_eq!(decode_all(src), vec![text("é"), text("中"), text("🦀")]);
    }

    #[test]
    fn truncated_utf8_is_unmapped() {
        let src = ScriptedSource::new().bytes(&[0xE4, 0xB8]).pause().bytes(b"a");
        assert_eq!(decode_all(src), vec![Input::Unmapped, text("a")]);
    }

    #[test]
    fn stray_continuation_byte_is_unmapped() {
        assert_eq!(decode_all(ScriptedSource::new().bytes(&[0x80, 0xFF])), vec![Input::Unmapped, Input::Unmapped]);
    }

    // ── Controls ────────────────────────────────────────────────────────

    #[test]
    fn control_shortcuts() {
        let src = ScriptedSource::new().bytes(&[0x01, 0x03, 0x16, 0x18, 0x19, 0x1A]);
        assert_eq!(
            decode_all(src),
            vec![
                Input::Action(Action::SelectAll),
                Input::Action(Action::Copy),
                Input::Action(Action::Paste),
                Input::Action(Action::Cut),
                Input::Action(Action::Redo),
                Input::Action(Action::Undo),
            ]
        );
    }

    #[test]
    fn ctrl_q_quits() {
        assert_eq!(decode_all(ScriptedSource::new().bytes(&[CTRL_Q])), vec![Input::Quit]);
    }

    #[test]
    fn other_controls_are_unmapped() {
        assert_eq!(decode_all(ScriptedSource::new().bytes(&[0x02, 0x00])), vec![Input::Unmapped, Input::Unmapped]);
    }

    #[test]
    fn backspace_variants() {
        assert_eq!(
            decode_all(ScriptedSource::new().bytes(&[DEL, BACKSPACE])),
            vec![Input::Action(Action::DeleteLeftCharacter); 2]
        );
    }

    // ── Escapes ─────────────────────────────────────────────────────────

    #[test]
    fn escape_sequence_then_text() {
        let src = ScriptedSource::new().bytes(b"\x1b[Ax");
        assert_eq!(decode_all(src), vec![Input::Action(Action::MoveUpLine), text("x")]);
    }

    #[test]
    fn bare_escape_is_unmapped() {
        let src = ScriptedSource::new().bytes(&[ESC]).pause().bytes(b"q");
        assert_eq!(decode_all(src), vec![Input::Unmapped, text("q")]);
    }

    #[test]
    fn unknown_sequence_is_unmapped() {
        let src = ScriptedSource::new().bytes(b"\x1b[15~");
        assert_eq!(decode_all(src), vec![Input::Unmapped]);
    }

    #[test]
    fn idle_polls_are_timeouts() {
        let src = ScriptedSource::new().pauses(2);
        assert_eq!(decode_all(src), vec![Input::Timeout, Input::Timeout]);
    }
}
