// SPDX-License-Identifier: MIT
//
// The editing engine, as the host sees it.
//
// The engine owns its document, selection, undo history and view tree. The
// host never keeps a view beyond one render pass: it borrows the tree from
// the engine, walks it, and lets go.

use th_term::screen::ClipRect;

use crate::action::Action;
use crate::platform::{Platform, SemanticRenderer, Window};

// ─── Views ───────────────────────────────────────────────────────────────────

/// A node of the engine's view tree.
pub trait View {
    /// This view's region, relative to its parent's origin.
    fn bounds(&self) -> ClipRect;

    /// Paint this view. Coordinates are local to [`bounds`](View::bounds).
    fn render(&self, renderer: &mut dyn SemanticRenderer);

    /// Child views, painted after this one and clipped to it.
    fn children(&self) -> Vec<&dyn View> {
        Vec::new()
    }
}

// ─── Clipboard Events ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardEventKind {
    Cut,
    Copy,
    Paste,
}

/// A clipboard exchange with the engine.
///
/// For cut and copy the engine fills `text` with what left the document.
/// For paste the host fills `text` before dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEvent {
    pub kind: ClipboardEventKind,
    pub text: String,
}

impl ClipboardEvent {
    #[must_use]
    pub const fn new(kind: ClipboardEventKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    #[must_use]
    pub const fn paste(text: String) -> Self {
        Self {
            kind: ClipboardEventKind::Paste,
            text,
        }
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Everything the engine may ask of its host while attaching.
pub trait Surface: Platform + Window {}

impl<T: Platform + Window> Surface for T {}

/// The engine interface the host drives.
pub trait EditorEngine {
    /// Called once, before the first resize. The engine may query the
    /// platform and configure the window here.
    fn attach(&mut self, surface: &mut dyn Surface);

    /// The area available to the engine, in cells.
    fn resize(&mut self, width: u16, height: u16);

    /// Root views in paint order.
    fn views(&self) -> Vec<&dyn View>;

    fn trigger_action(&mut self, action: Action);

    fn insert_text(&mut self, text: &str);

    fn dispatch_clipboard_event(&mut self, event: &mut ClipboardEvent);

    /// The view keyboard input currently goes to, if any.
    fn view_with_focus(&self) -> Option<&dyn View>;
}
