// SPDX-License-Identifier: MIT
//
// termhost: run an editing engine inside a character-cell terminal.
//
// The binary wires the crates together:
//
//   th-term → raw mode, alternate screen, cell grid, differential output
//   th-host → clip stack, compositor, key decoding, clipboard, scheduling
//
// and hosts the scratch-pad engine from `scratch`. There are no flags; the
// host reads its knobs from `TERMHOST_*` environment variables. Logging is
// off unless `TERMHOST_LOG` holds a filter directive, in which case events go
// to `termhost.log` in the temp directory (stdout belongs to the screen).
//
// Quit with Ctrl+Q. The terminal is restored on every exit path.

mod scratch;

use std::sync::Once;

use anyhow::{Context, Result};
use th_host::clipboard::ClipboardBridge;
use th_host::config::HostConfig;
use th_host::runner::Runner;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::scratch::ScratchEditor;

/// Filter directive for the log file, e.g. `debug` or `input=trace`.
const ENV_LOG: &str = "TERMHOST_LOG";

const LOG_FILE: &str = "termhost.log";

fn main() -> Result<()> {
    let _guard = configure_logging();
    install_panic_hook();

    let config = HostConfig::from_env();
    tracing::info!(target: "runtime", ?config, "configured");

    let mut runner = Runner::new(config).context("failed to initialize the terminal")?;
    let mut editor = ScratchEditor::new();
    runner
        .run(&mut editor, ClipboardBridge::system())
        .context("terminal session failed")?;

    tracing::info!(target: "runtime", "clean exit");
    Ok(())
}

/// Send tracing output to a file when `TERMHOST_LOG` is set.
///
/// The returned guard flushes the non-blocking writer when dropped, so it
/// must live until `main` returns.
fn configure_logging() -> Option<WorkerGuard> {
    let filter = std::env::var(ENV_LOG).ok()?;
    let log_dir = std::env::temp_dir();

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Log panics before the default hook prints them.
///
/// Installed before the terminal takes over, so the terminal's own restore
/// hook runs first and the message lands on a sane screen.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
