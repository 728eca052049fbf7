// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, resize signal, restore.
//
// Safety: termios, ioctl(TIOCGWINSZ), isatty, sigaction and the raw fd write
// in the panic path are plain POSIX calls with no safe std equivalent. Each
// unsafe block wraps exactly one of them.
#![allow(unsafe_code)]
//
// Two layers. `RawMode` is the termios half: it saves the attributes stdin
// had, switches to `cfmakeraw`, and puts the saved copy back on restore.
// `Terminal` is the screen half: alternate screen, hidden hardware cursor,
// window title. It owns a `RawMode` while active and undoes both on `leave`
// or on drop.
//
// A panic mid-frame cannot rely on either. The panic hook therefore writes a
// fixed restore sequence straight to fd 1 (no stdout lock to deadlock on),
// puts the termios backup back, then hands over to the previous hook.
//
// SIGWINCH only flips an atomic. poll(2) is not restarted after a signal, so
// a pending input wait returns early and the run loop picks up the new size
// on its next iteration.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi::{self, DecMode};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when stdout is not a terminal (tests, pipes).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

#[cfg(unix)]
fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == 0;
    (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
const fn query_size() -> Option<Size> {
    None
}

// ─── Resize Signal ──────────────────────────────────────────────────────────

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler. Idempotent.
#[cfg(unix)]
pub fn install_resize_handler() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigwinch as *const () as usize;
        libc::sigemptyset(&raw mut action.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const action, std::ptr::null_mut());
    });
}

// Async-signal-safe: one atomic store.
#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install_resize_handler() {}

/// Whether the terminal was resized since the last call. Clears the flag.
#[inline]
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// The termios attributes to put back if we panic while raw.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Stdin switched to raw mode. Keys arrive byte by byte with no echo, and
/// Ctrl+C, Ctrl+Z, Ctrl+Q and Ctrl+S reach us instead of the line discipline.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `None` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(None);
        }

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut raw = saved;
        unsafe { libc::cfmakeraw(&raw mut raw) };
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_termios(libc::TCSAFLUSH, &raw)?;

        if let Ok(mut backup) = SAVED_TERMIOS.lock() {
            *backup = Some(saved);
        }
        Ok(Some(Self { saved }))
    }

    fn restore(&self) -> io::Result<()> {
        set_termios(libc::TCSAFLUSH, &self.saved)?;
        if let Ok(mut backup) = SAVED_TERMIOS.lock() {
            *backup = None;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_termios(when: libc::c_int, termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, when, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    const fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// End synchronized output, reset SGR, show the cursor, and leave the
/// alternate screen last so the shell's content comes back clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

fn install_panic_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(backup) = SAVED_TERMIOS.lock() {
            if let Some(saved) = backup.as_ref() {
                let _ = set_termios(libc::TCSANOW, saved);
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Handle on the controlling terminal.
///
/// [`enter`](Self::enter) takes the terminal over; [`leave`](Self::leave),
/// dropping the handle, or a panic gives it back.
///
/// ```no_run
/// use th_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// term.set_title("termhost")?;
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Query the size without touching the terminal's modes.
    ///
    /// # Errors
    ///
    /// Infallible today. The signature leaves room for platforms whose
    /// console setup can fail.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            raw: None,
            size: query_size().unwrap_or(Size::FALLBACK),
            active: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-read the size after a resize. Keeps the old size if the query
    /// fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = query_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or the terminal write fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::dec_mode(&mut out, DecMode::AltScreen, true)?;
        ansi::dec_mode(&mut out, DecMode::CursorVisible, false)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal write or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        {
            let mut out = io::stdout().lock();
            ansi::dec_mode(&mut out, DecMode::SyncOutput, false)?;
            ansi::reset(&mut out)?;
            ansi::dec_mode(&mut out, DecMode::CursorVisible, true)?;
            ansi::dec_mode(&mut out, DecMode::AltScreen, false)?;
            out.flush()?;
        }

        match self.raw.take() {
            Some(raw) => raw.restore(),
            None => Ok(()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        ansi::set_title(&mut out, title)?;
        out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
