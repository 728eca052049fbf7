// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state and
// no decisions about when to emit; the `CellWriter` makes those. This module
// only knows the byte-level encoding of the commands the host needs.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

use crate::cell::Attr;
use crate::palette::AnsiColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// The stateful renderer must invalidate its tracked state after calling this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color (SGR 30–37, or 39 for the default).
pub fn fg(w: &mut impl Write, color: AnsiColor) -> io::Result<()> {
    match color.index() {
        None => w.write_all(b"\x1b[39m"),
        Some(idx) => write!(w, "\x1b[{}m", 30 + u16::from(idx)),
    }
}

/// Set the background color (SGR 40–47, or 49 for the default).
pub fn bg(w: &mut impl Write, color: AnsiColor) -> io::Result<()> {
    match color.index() {
        None => w.write_all(b"\x1b[49m"),
        Some(idx) => write!(w, "\x1b[{}m", 40 + u16::from(idx)),
    }
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit SGR codes for text attributes as a single CSI sequence.
///
/// `ALT_CHARSET` has no SGR code: the glyph itself is translated before
/// output. Does nothing if no SGR-bearing attributes are set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    let codes: Vec<&str> = [
        (Attr::BOLD, "1"),
        (Attr::UNDERLINE, "4"),
        (Attr::REVERSE, "7"),
    ]
    .into_iter()
    .filter(|(flag, _)| attr.contains(*flag))
    .map(|(_, code)| code)
    .collect();

    if codes.is_empty() {
        return Ok(());
    }
    write!(w, "\x1b[{}m", codes.join(";"))
}

// ─── DEC Private Modes ───────────────────────────────────────────────────────

/// The DEC private modes the host toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DecMode {
    /// DECTCEM. The host keeps the hardware cursor hidden and draws carets
    /// as underlined cells instead.
    CursorVisible = 25,
    /// Alternate screen buffer, restoring the shell's content on exit.
    AltScreen = 1049,
    /// Synchronized output. Terminals buffer everything between set and
    /// reset and show it as one frame; those without support ignore it.
    SyncOutput = 2026,
}

/// Set (`CSI ? n h`) or reset (`CSI ? n l`) a private mode.
#[inline]
pub fn dec_mode(w: &mut impl Write, mode: DecMode, enabled: bool) -> io::Result<()> {
    let op = if enabled { 'h' } else { 'l' };
    write!(w, "\x1b[?{}{op}", mode as u16)
}

// ─── Window Title ───────────────────────────────────────────────────────────

/// Set the terminal window title (OSC 2). Control bytes are stripped.
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    let clean: String = title.chars().filter(|c| !c.is_control()).collect();
    write!(w, "\x1b]2;{clean}\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_position() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_u16_max_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, 0)), "\x1b[1;65536H");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_and_reset() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_colors() {
        assert_eq!(emit(|w| fg(w, AnsiColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| fg(w, AnsiColor::Black)), "\x1b[30m");
        assert_eq!(emit(|w| fg(w, AnsiColor::Cyan)), "\x1b[36m");
    }

    #[test]
    fn bg_colors() {
        assert_eq!(emit(|w| bg(w, AnsiColor::Default)), "\x1b[49m");
        assert_eq!(emit(|w| bg(w, AnsiColor::Yellow)), "\x1b[43m");
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attrs_single() {
        assert_eq!(emit(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(emit(|w| attrs(w, Attr::UNDERLINE)), "\x1b[4m");
    }

    #[test]
    fn attrs_combined() {
        assert_eq!(
            emit(|w| attrs(w, Attr::BOLD | Attr::UNDERLINE | Attr::REVERSE)),
            "\x1b[1;4;7m"
        );
    }

    #[test]
    fn attrs_empty_or_alt_only_emits_nothing() {
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
        assert_eq!(emit(|w| attrs(w, Attr::ALT_CHARSET)), "");
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn private_modes() {
        assert_eq!(emit(|w| dec_mode(w, DecMode::CursorVisible, false)), "\x1b[?25l");
        assert_eq!(emit(|w| dec_mode(w, DecMode::CursorVisible, true)), "\x1b[?25h");
        assert_eq!(emit(|w| dec_mode(w, DecMode::SyncOutput, true)), "\x1b[?2026h");
        assert_eq!(emit(|w| dec_mode(w, DecMode::AltScreen, false)), "\x1b[?1049l");
    }

    #[test]
    fn title_strips_control_bytes() {
        assert_eq!(emit(|w| set_title(w, "a\x07b\x1bc")), "\x1b]2;abc\x07");
    }
}
