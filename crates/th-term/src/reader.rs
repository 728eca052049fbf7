// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources: timeout-capable single-byte input for the decoder.
//
// The host's input decoding is a small state machine that asks for one byte
// at a time and treats "nothing arrived within T" as meaningful (a lone ESC
// is the Escape key, not the start of a sequence). So the reading primitive
// is `read_byte(timeout)` rather than a stream of chunks.
//
// `StdinSource` implements it with poll(2) + read(2) on the stdin fd and an
// internal queue: one read() drains whatever the terminal has buffered (a
// whole escape sequence, or a paste) and later calls are served from the
// queue without touching the fd. Everything stays on the main thread.
//
// `ScriptedSource` replays a fixed script of bytes and pauses, which is how
// the decoder and the run loop are tested without a terminal.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Chunk size for a single read(2). A keypress is 1–6 bytes, a paste can be
/// kilobytes; 4 KB covers both.
const READ_BUF_SIZE: usize = 4096;

// ─── ByteSource ──────────────────────────────────────────────────────────────

/// Result of asking a source for one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A byte arrived within the timeout.
    Byte(u8),
    /// Nothing arrived within the timeout (or the wait was interrupted).
    Timeout,
    /// The source is exhausted (EOF).
    Closed,
}

/// Anything that can hand out input bytes one at a time with a timeout.
pub trait ByteSource {
    /// Wait at most `timeout` for the next byte.
    ///
    /// # Errors
    ///
    /// Returns an error only for unrecoverable I/O failures. Timeouts and
    /// signal interruptions are reported as [`ReadOutcome::Timeout`].
    fn read_byte(&mut self, timeout: Duration) -> io::Result<ReadOutcome>;
}

// ─── StdinSource ─────────────────────────────────────────────────────────────

/// Poll-driven reader over the process's stdin.
#[derive(Debug, Default)]
pub struct StdinSource {
    pending: VecDeque<u8>,
}

impl StdinSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes already read from the fd but not yet handed out.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    #[cfg(unix)]
    fn fill(&mut self, timeout: Duration) -> io::Result<ReadOutcome> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, timeout_ms)
        };

        // 0 = timeout, <0 = EINTR (e.g. SIGWINCH) or a transient failure.
        if ready <= 0 {
            return Ok(ReadOutcome::Timeout);
        }

        let mut buf = [0u8; READ_BUF_SIZE];
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };

        if n == 0 {
            return Ok(ReadOutcome::Closed);
        }
        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(ReadOutcome::Timeout),
                _ => Err(err),
            };
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
        self.pending.extend(&buf[..n as usize]);
        Ok(self
            .pending
            .pop_front()
            .map_or(ReadOutcome::Timeout, ReadOutcome::Byte))
    }

    /// Non-unix fallback: blocking read, timeouts never fire.
    #[cfg(not(unix))]
    fn fill(&mut self, _timeout: Duration) -> io::Result<ReadOutcome> {
        use std::io::Read;

        let mut buf = [0u8; READ_BUF_SIZE];
        let n = io::stdin().lock().read(&mut buf)?;
        if n == 0 {
            return Ok(ReadOutcome::Closed);
        }
        self.pending.extend(&buf[..n]);
        Ok(self
            .pending
            .pop_front()
            .map_or(ReadOutcome::Timeout, ReadOutcome::Byte))
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<ReadOutcome> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(ReadOutcome::Byte(byte));
        }
        self.fill(timeout)
    }
}

// ─── ScriptedSource ──────────────────────────────────────────────────────────

/// A byte source that replays a script, ignoring real time.
///
/// Each scripted pause produces exactly one [`ReadOutcome::Timeout`]. Once
/// the script runs out the source reports [`ReadOutcome::Closed`].
///
/// ```
/// use std::time::Duration;
/// use th_term::reader::{ByteSource, ReadOutcome, ScriptedSource};
///
/// let mut src = ScriptedSource::new().bytes(b"a").pause();
/// let t = Duration::from_millis(50);
/// assert_eq!(src.read_byte(t).unwrap(), ReadOutcome::Byte(b'a'));
/// assert_eq!(src.read_byte(t).unwrap(), ReadOutcome::Timeout);
/// assert_eq!(src.read_byte(t).unwrap(), ReadOutcome::Closed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes that arrive back to back.
    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append one idle period.
    #[must_use]
    pub fn pause(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Append `n` idle periods.
    #[must_use]
    pub fn pauses(mut self, n: usize) -> Self {
        self.script.extend(std::iter::repeat_n(None, n));
        self
    }

    /// Steps not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self, _timeout: Duration) -> io::Result<ReadOutcome> {
        Ok(match self.script.pop_front() {
            Some(Some(byte)) => ReadOutcome::Byte(byte),
            Some(None) => ReadOutcome::Timeout,
            None => ReadOutcome::Closed,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
