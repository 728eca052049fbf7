// SPDX-License-Identifier: MIT
//
// Editing actions: the vocabulary input decoding produces and the engine
// consumes. Names follow the engine's "verb, direction, unit" convention.

/// An abstract editing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // ── Clipboard ────────────────────────────────────────────────────────
    Cut,
    Copy,
    Paste,

    // ── History ──────────────────────────────────────────────────────────
    Undo,
    Redo,

    // ── Selection ────────────────────────────────────────────────────────
    SelectAll,
    /// Collapse a multi-region selection down to its first region.
    SelectFirstRegion,
    SelectUpLine,
    SelectDownLine,
    SelectLeftCharacter,
    SelectRightCharacter,

    // ── Deletion ─────────────────────────────────────────────────────────
    DeleteLeftCharacter,
    DeleteRightCharacter,

    // ── Movement ─────────────────────────────────────────────────────────
    MoveUpLine,
    MoveDownLine,
    MoveLeftCharacter,
    MoveRightCharacter,
    MoveLeftWord,
    MoveRightWord,
    /// Start of the current line.
    MoveLeftLine,
    /// End of the current line.
    MoveRightLine,
    MoveUpPage,
    MoveDownPage,
    MoveUpDocument,
    MoveDownDocument,
}

impl Action {
    /// Whether the host routes this action through the clipboard bridge
    /// instead of handing it straight to the engine.
    #[inline]
    #[must_use]
    pub const fn is_clipboard(self) -> bool {
        matches!(self, Self::Cut | Self::Copy | Self::Paste)
    }
}
