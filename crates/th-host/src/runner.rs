// SPDX-License-Identifier: MIT
//
// Runner: the poll loop that ties the terminal to the engine.
//
// Single-threaded and cooperative. Each iteration waits at most one poll
// timeout for the next input unit, hands it to the engine, and asks the
// frame scheduler whether to repaint. Resizes arrive through the SIGWINCH
// flag and are handled between iterations. A repaint walks the whole view
// tree into the host's screen, and the diff renderer writes only the cells
// that changed.
//
// The terminal is restored on every way out: normal quit and end of input
// return through `leave`, errors too, and a panic is caught by the
// terminal's panic hook (plus `Drop` as a last resort).

use std::io;

use th_term::diff::DiffRenderer;
use th_term::reader::{ByteSource, StdinSource};
use th_term::terminal::{self, Size, Terminal};

use crate::clipboard::ClipboardBridge;
use crate::config::HostConfig;
use crate::engine::EditorEngine;
use crate::host::Host;
use crate::keys::{Input, InputDecoder};
use crate::scheduler::FrameDecision;

// ─── Step ────────────────────────────────────────────────────────────────────

/// What one loop iteration concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue(FrameDecision),
    Quit,
}

/// Decode one input unit, dispatch it, and ask the scheduler what to do.
///
/// This is the terminal-independent half of an iteration.
///
/// # Errors
///
/// Propagates I/O errors from the source.
pub fn step(
    host: &mut Host,
    engine: &mut dyn EditorEngine,
    decoder: &InputDecoder,
    source: &mut dyn ByteSource,
) -> io::Result<Step> {
    let input = decoder.next(source)?;
    let decision = match input {
        Input::Quit | Input::Closed => {
            tracing::info!(target: "runtime", ?input, "exit");
            return Ok(Step::Quit);
        }
        Input::Timeout => host.scheduler_mut().on_timeout(),
        Input::Action(action) => {
            host.trigger_action(engine, action);
            host.scheduler_mut().on_key()
        }
        Input::Text(text) => {
            host.insert_text(engine, &text);
            host.scheduler_mut().on_key()
        }
        // Still a keypress: it wakes the carets.
        Input::Unmapped => host.scheduler_mut().on_key(),
    };
    Ok(Step::Continue(decision))
}

/// Combine the loop's outcome with the terminal restore's. The loop's error
/// wins; a restore failure behind it is logged rather than lost.
fn settle(result: io::Result<()>, restored: io::Result<()>) -> io::Result<()> {
    match (result, restored) {
        (Err(err), Err(restore)) => {
            tracing::error!(target: "runtime", %restore, "terminal restore failed");
            Err(err)
        }
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Ok(()), Ok(())) => Ok(()),
    }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

pub struct Runner {
    terminal: Terminal,
    renderer: DiffRenderer,
    config: HostConfig,
}

impl Runner {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new(config: HostConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            renderer: DiffRenderer::new(config.palette),
            config,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Take over the terminal and run `engine` until the user quits or
    /// input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, rendering or restore fails.
    pub fn run(
        &mut self,
        engine: &mut dyn EditorEngine,
        clipboard: ClipboardBridge,
    ) -> io::Result<()> {
        self.terminal.enter()?;
        terminal::install_resize_handler();
        tracing::info!(target: "runtime", cols = self.size().cols, rows = self.size().rows, "start");

        let mut source = StdinSource::new();
        let result = self.run_inner(engine, clipboard, &mut source);

        // Always restore, even if the loop errored.
        let restored = self.terminal.leave();
        settle(result, restored)
    }

    fn run_inner(
        &mut self,
        engine: &mut dyn EditorEngine,
        clipboard: ClipboardBridge,
        source: &mut dyn ByteSource,
    ) -> io::Result<()> {
        let size = self.terminal.size();
        let mut host = Host::new(&self.config, size, clipboard);
        engine.attach(&mut host);
        host.handle_resize(engine, size);
        self.present(&mut host, engine)?;

        let decoder = InputDecoder::new(self.config.poll_timeout, self.config.escape_timeout);

        loop {
            let mut decision = match step(&mut host, engine, &decoder, source)? {
                Step::Quit => return Ok(()),
                Step::Continue(decision) => decision,
            };

            if terminal::take_resize() {
                let size = self.terminal.refresh_size();
                host.handle_resize(engine, size);
                self.renderer.force_redraw();
                decision = host.scheduler_mut().on_resize();
            }

            if decision == FrameDecision::Redraw {
                self.present(&mut host, engine)?;
            }
        }
    }

    /// Repaint the view tree and flush the changes.
    fn present(&mut self, host: &mut Host, engine: &dyn EditorEngine) -> io::Result<()> {
        if let Some(title) = host.take_title_change() {
            self.terminal.set_title(title)?;
        }

        host.render(engine);
        let stats = self.renderer.render(host.screen());
        tracing::trace!(
            target: "render",
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            bytes = stats.bytes_written,
            "frame"
        );
        self.renderer.flush()
    }
}
