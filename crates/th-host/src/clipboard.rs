// SPDX-License-Identifier: MIT
//
// Clipboard bridge: the system clipboard through helper programs.
//
// There is no portable clipboard API for a terminal program, so we shell out
// to whichever helper the platform has (pbcopy on macOS, wl-copy or xclip or
// xsel on Linux, clip.exe under WSL) and keep our own copy of the last value.
// When no helper works the cached value is the clipboard, which keeps
// cut/copy/paste working inside the editor on a bare console or over ssh.
//
// Nothing here reports failure to the caller. Helper failures are logged at
// debug level and otherwise ignored.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why one helper invocation did not work.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to pipe text to `{program}`: {source}")]
    Stdin {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Exit {
        program: &'static str,
        status: ExitStatus,
    },
    #[error("`{program}` produced non-UTF-8 output")]
    Utf8 { program: &'static str },
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// A helper program and its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl ClipboardCommand {
    #[must_use]
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(self.args);
        cmd
    }

    /// Run the helper with `text` on its stdin.
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let program = self.program;
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn { program, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|source| ClipboardError::Stdin { program, source })?;
            // Dropping stdin closes the pipe so the helper sees EOF.
        }

        let status = child
            .wait()
            .map_err(|source| ClipboardError::Spawn { program, source })?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Exit { program, status })
        }
    }

    /// Run the helper and take its stdout.
    fn paste(&self) -> Result<String, ClipboardError> {
        let program = self.program;
        let output = self
            .command()
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| ClipboardError::Spawn { program, source })?;

        if !output.status.success() {
            return Err(ClipboardError::Exit {
                program,
                status: output.status,
            });
        }
        String::from_utf8(output.stdout).map_err(|_| ClipboardError::Utf8 { program })
    }
}

/// Copy helpers, tried in order.
pub const COPY_COMMANDS: &[ClipboardCommand] = &[
    ClipboardCommand::new("pbcopy", &[]),
    ClipboardCommand::new("wl-copy", &[]),
    ClipboardCommand::new("xclip", &["-selection", "clipboard"]),
    ClipboardCommand::new("xsel", &["--clipboard", "--input"]),
    ClipboardCommand::new("clip.exe", &[]),
];

/// Paste helpers, tried in order.
pub const PASTE_COMMANDS: &[ClipboardCommand] = &[
    ClipboardCommand::new("pbpaste", &[]),
    ClipboardCommand::new("wl-paste", &["--no-newline"]),
    ClipboardCommand::new("xclip", &["-selection", "clipboard", "-o"]),
    ClipboardCommand::new("xsel", &["--clipboard", "--output"]),
    ClipboardCommand::new("powershell.exe", &["-noprofile", "-command", "Get-Clipboard"]),
];

// ─── Bridge ──────────────────────────────────────────────────────────────────

/// The clipboard as the host sees it: a cached value plus the helpers that
/// mirror it to the system.
#[derive(Debug, Clone, Default)]
pub struct ClipboardBridge {
    copy_commands: Vec<ClipboardCommand>,
    paste_commands: Vec<ClipboardCommand>,
    cached: String,
}

impl ClipboardBridge {
    /// Bridge using the platform helpers.
    #[must_use]
    pub fn system() -> Self {
        Self::with_commands(COPY_COMMANDS.to_vec(), PASTE_COMMANDS.to_vec())
    }

    /// Bridge with no helpers: a private in-process clipboard.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_commands(
        copy_commands: Vec<ClipboardCommand>,
        paste_commands: Vec<ClipboardCommand>,
    ) -> Self {
        Self {
            copy_commands,
            paste_commands,
            cached: String::new(),
        }
    }

    /// Store `text` and hand it to every copy helper.
    pub fn write(&mut self, text: &str) {
        text.clone_into(&mut self.cached);
        for cmd in &self.copy_commands {
            if let Err(err) = cmd.copy(text) {
                tracing::debug!(target: "clipboard", %err, "copy_helper_failed");
            }
        }
    }

    /// The system clipboard from the first paste helper that works, or the
    /// cached value when none does.
    pub fn read(&mut self) -> String {
        for cmd in &self.paste_commands {
            match cmd.paste() {
                Ok(text) => {
                    self.cached.clone_from(&text);
                    return text;
                }
                Err(err) => tracing::debug!(target: "clipboard", %err, "paste_helper_failed"),
            }
        }
        self.cached.clone()
    }

    /// The last value written or successfully read.
    #[must_use]
    pub fn cached(&self) -> &str {
        &self.cached
    }
}
