// SPDX-License-Identifier: MIT
//
// Escape-sequence decoder.
//
// After an ESC byte the terminal may be telling us about a special key
// (`ESC [ A` is the up arrow) or the user may simply have pressed Escape.
// The only way to tell is time: the bytes of a sequence arrive together,
// a bare Escape is followed by silence.
//
// The decoder reads bytes after the ESC until one of them is a final byte
// (>= 0x40, so a letter or `~`) or the source goes quiet. A lone `[` is
// never final on its own, since it opens every CSI sequence. When that is
// all that arrived before the timeout it is reported as its own case.
//
// The collected bytes are looked up in a fixed table. Anything not in the
// table is dropped. A sequence that outgrows the buffer is read to its end
// and discarded, so its tail is never taken for typed text.

use std::io;
use std::time::Duration;

use th_term::reader::{ByteSource, ReadOutcome};

use crate::action::Action;

/// Longest sequence we bother keeping. Real keys are at most 6 bytes;
/// anything longer is drained and dropped.
const MAX_SEQUENCE: usize = 32;

/// What followed an ESC byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escape {
    /// Nothing arrived in time: the Escape key itself.
    Bare,
    /// `[` and then silence.
    LoneBracket,
    /// The bytes after ESC, up to and including the final byte.
    Sequence(Vec<u8>),
}

impl Escape {
    /// Collect the bytes following an ESC that was just read.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the source.
    pub fn read(source: &mut dyn ByteSource, timeout: Duration) -> io::Result<Self> {
        let mut seq = Vec::new();

        loop {
            match source.read_byte(timeout)? {
                ReadOutcome::Byte(byte) => seq.push(byte),
                ReadOutcome::Timeout | ReadOutcome::Closed => break,
            }
            let open = seq == b"[" || seq.last().is_some_and(|&b| b < 0x40);
            if !open {
                break;
            }
            if seq.len() >= MAX_SEQUENCE {
                let dropped = drain(source, timeout)?;
                tracing::debug!(target: "input.escape", dropped, "oversized_sequence");
                break;
            }
        }

        Ok(match seq.as_slice() {
            [] => Self::Bare,
            b"[" => Self::LoneBracket,
            _ => Self::Sequence(seq),
        })
    }

    /// The editing action this escape stands for, if any.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Bare => None,
            Self::LoneBracket => Some(Action::SelectFirstRegion),
            Self::Sequence(seq) => {
                let action = lookup(seq);
                if action.is_none() {
                    tracing::trace!(
                        target: "input.escape",
                        sequence = %String::from_utf8_lossy(seq),
                        "unmapped_sequence"
                    );
                }
                action
            }
        }
    }
}

/// Discard bytes through the next final byte or until the source goes
/// quiet. Returns how many were discarded.
fn drain(source: &mut dyn ByteSource, timeout: Duration) -> io::Result<usize> {
    let mut dropped = 0;
    while let ReadOutcome::Byte(byte) = source.read_byte(timeout)? {
        dropped += 1;
        if byte >= 0x40 {
            break;
        }
    }
    Ok(dropped)
}

/// The fixed sequence table.
#[must_use]
pub fn lookup(seq: &[u8]) -> Option<Action> {
    let action = match seq {
        // ── Arrows ───────────────────────────────────────────────────────
        b"[A" => Action::MoveUpLine,
        b"[B" => Action::MoveDownLine,
        b"[C" => Action::MoveRightCharacter,
        b"[D" => Action::MoveLeftCharacter,

        // ── Shift+Arrows ─────────────────────────────────────────────────
        b"[1;2A" => Action::SelectUpLine,
        b"[1;2B" => Action::SelectDownLine,
        b"[1;2C" => Action::SelectRightCharacter,
        b"[1;2D" => Action::SelectLeftCharacter,

        // ── Alt/Ctrl+Arrows ──────────────────────────────────────────────
        b"[1;3C" | b"[1;5C" => Action::MoveRightWord,
        b"[1;3D" | b"[1;5D" => Action::MoveLeftWord,

        // ── Home / End ───────────────────────────────────────────────────
        b"[H" | b"[1~" | b"[7~" => Action::MoveLeftLine,
        b"[F" | b"[4~" | b"[8~" => Action::MoveRightLine,
        b"[1;5H" => Action::MoveUpDocument,
        b"[1;5F" => Action::MoveDownDocument,

        // ── Editing keypad ───────────────────────────────────────────────
        b"[5~" => Action::MoveUpPage,
        b"[6~" => Action::MoveDownPage,
        b"[3~" => Action::DeleteRightCharacter,

        _ => return None,
    };
    Some(action)
}
