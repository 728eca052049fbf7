// SPDX-License-Identifier: MIT
//
// Host: the one object the engine talks to.
//
// The engine sees three narrow interfaces: `Platform` for environment
// queries, `Window` for the surface it lives in and `SemanticRenderer` for
// paint calls. A terminal has a single window and a single renderer, so one
// struct implements all three and owns everything they share: the screen,
// the clip stack, the width cache, the clipboard and the frame scheduler.
//
// The engine itself is not owned here. The run loop holds both and passes
// the engine into the operations that need it, so a render pass can borrow
// the view tree from the engine while painting into the host.

use std::time::{SystemTime, UNIX_EPOCH};

use th_term::screen::Screen;
use th_term::terminal::Size;

use crate::action::Action;
use crate::clip::ClipStack;
use crate::clipboard::ClipboardBridge;
use crate::color::Color;
use crate::compositor::{Canvas, PaintOptions};
use crate::config::{GlyphPolicy, HostConfig, MarginPolicy};
use crate::engine::{ClipboardEvent, ClipboardEventKind, EditorEngine, View};
use crate::platform::{
    CursorKind, Font, FontMetrics, OperatingSystem, Platform, SemanticRenderer, UserAgent, Window,
};
use crate::scheduler::FrameScheduler;
use crate::width::{Advance, WidthCache};

pub struct Host {
    screen: Screen,
    clip: ClipStack,
    widths: WidthCache,
    clipboard: ClipboardBridge,
    scheduler: FrameScheduler,
    margin: MarginPolicy,
    glyphs: GlyphPolicy,
    title: String,
    title_changed: bool,
    cursor: CursorKind,
}

impl Host {
    #[must_use]
    pub fn new(config: &HostConfig, size: Size, clipboard: ClipboardBridge) -> Self {
        Self {
            screen: Screen::new(size.cols, size.rows),
            clip: ClipStack::new(),
            widths: WidthCache::new(),
            clipboard,
            scheduler: FrameScheduler::new(config.redraw, config.blink_period),
            margin: config.margin,
            glyphs: config.glyphs,
            title: String::new(),
            title_changed: false,
            cursor: CursorKind::default(),
        }
    }

    /// Replace the width oracle.
    #[must_use]
    pub fn with_widths(mut self, widths: WidthCache) -> Self {
        self.widths = widths;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    #[inline]
    #[must_use]
    pub const fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    #[inline]
    pub const fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    #[inline]
    #[must_use]
    pub const fn clipboard(&self) -> &ClipboardBridge {
        &self.clipboard
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title, if it changed since the last call.
    pub fn take_title_change(&mut self) -> Option<&str> {
        std::mem::take(&mut self.title_changed).then_some(self.title.as_str())
    }

    #[must_use]
    pub const fn cursor(&self) -> CursorKind {
        self.cursor
    }

    // ─── Operations ──────────────────────────────────────────────────────

    /// Adopt a new terminal size and pass it on to the engine.
    ///
    /// The engine gets one column less than the terminal has, so a caret at
    /// the end of the longest line still lands on a visible cell.
    pub fn handle_resize(&mut self, engine: &mut dyn EditorEngine, size: Size) {
        self.screen.resize(size.cols, size.rows);
        engine.resize(size.cols.saturating_sub(1), size.rows);
        tracing::debug!(target: "render", cols = size.cols, rows = size.rows, "resize");
    }

    /// Repaint the whole view tree into the screen.
    ///
    /// # Panics
    ///
    /// Panics if a view leaves the clip stack unbalanced.
    pub fn render(&mut self, engine: &dyn EditorEngine) {
        self.screen.clear();
        self.clip.begin(self.screen.bounds());
        for view in engine.views() {
            self.render_view(view);
        }
        self.clip.end();
    }

    fn render_view(&mut self, view: &dyn View) {
        self.clip.push(view.bounds());
        view.render(self);
        for child in view.children() {
            self.render_view(child);
        }
        self.clip.pop();
    }

    /// Run an editing action. Clipboard actions go through the bridge; the
    /// rest go straight to the engine.
    pub fn trigger_action(&mut self, engine: &mut dyn EditorEngine, action: Action) {
        let kind = match action {
            Action::Cut => ClipboardEventKind::Cut,
            Action::Copy => ClipboardEventKind::Copy,
            Action::Paste => {
                let mut event = ClipboardEvent::paste(self.clipboard.read());
                engine.dispatch_clipboard_event(&mut event);
                return;
            }
            _ => {
                engine.trigger_action(action);
                return;
            }
        };

        if engine.view_with_focus().is_none() {
            return;
        }
        let mut event = ClipboardEvent::new(kind);
        engine.dispatch_clipboard_event(&mut event);
        self.clipboard.write(&event.text);
    }

    pub fn insert_text(&mut self, engine: &mut dyn EditorEngine, text: &str) {
        engine.insert_text(text);
    }

    fn canvas(&mut self) -> Canvas<'_> {
        let options = PaintOptions {
            carets_visible: self.scheduler.carets_visible(),
            margin: self.margin,
            glyphs: self.glyphs,
        };
        Canvas::new(&mut self.screen, &self.clip, &mut self.widths, options)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("screen", &self.screen)
            .field("clip_depth", &self.clip.depth())
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

// ─── Platform ────────────────────────────────────────────────────────────────

impl Platform for Host {
    fn operating_system(&self) -> OperatingSystem {
        OperatingSystem::Unknown
    }

    fn user_agent(&self) -> UserAgent {
        UserAgent::Unknown
    }

    fn now_in_seconds(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64())
    }

    fn font_metrics(&self, _font: Font) -> FontMetrics {
        FontMetrics::CELL
    }

    fn advance_width(&mut self, _font: Font, cp: u32) -> usize {
        self.widths.advance(cp, self.glyphs)
    }

    fn text_advance(&self) -> Advance {
        self.widths.advance_fn(self.glyphs)
    }
}

// ─── Window ──────────────────────────────────────────────────────────────────

impl Window for Host {
    fn set_title(&mut self, title: &str) {
        if self.title != title {
            title.clone_into(&mut self.title);
            self.title_changed = true;
        }
    }

    fn invalidate(&mut self) {
        self.scheduler.invalidate();
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursor = cursor;
    }

    fn size(&self) -> Size {
        Size {
            cols: self.screen.width(),
            rows: self.screen.height(),
        }
    }
}

// ─── SemanticRenderer ────────────────────────────────────────────────────────

impl SemanticRenderer for Host {
    fn render_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.canvas().paint_background(x, y, width, height, color);
    }

    fn render_caret(&mut self, x: i32, y: i32) {
        self.canvas().paint_caret(x, y);
    }

    fn render_text(&mut self, x: i32, y: i32, text: &str, color: Color, alpha: f32) {
        self.canvas().paint_text(x, y, text, color, alpha);
    }

    // Terminals have no way to draw these.

    fn render_squiggle(&mut self, _x: i32, _y: i32, _width: i32, _color: Color) {}

    fn render_rightward_shadow(&mut self, _x: i32, _y: i32, _width: i32, _height: i32) {}

    fn render_horizontal_line(&mut self, _x: i32, _y: i32, _width: i32, _color: Color) {}

    fn render_vertical_line(&mut self, _x: i32, _y: i32, _height: i32, _color: Color) {}

    fn render_scrollbar_thumb(&mut self, _x: i32, _y: i32, _width: i32, _height: i32) {}
}
