// SPDX-License-Identifier: MIT
//
// th-host: adapts a retained-mode editor view model onto a character-cell
// terminal, and raw terminal input back into editor actions.
//
// The editing engine speaks in views, clip rectangles, semantic colors,
// glyph runs and carets. The terminal speaks in cells. This crate sits in
// between:
//
//   - `width`      how many cells a codepoint takes, cached
//   - `clip`       nested clip rectangles for the view tree walk
//   - `compositor` merging semantic paint calls into cell attribute words
//   - `escape`     multi-byte escape sequences → actions, timeout-driven
//   - `keys`       control characters and text → actions / insertions
//   - `clipboard`  the platform clipboard via helper programs, with a cache
//   - `scheduler`  when to redraw, and the caret blink
//   - `host`       the adapter the engine sees (platform, window, renderer)
//   - `runner`     the poll loop that wires it all to a real terminal

pub mod action;
pub mod clip;
pub mod clipboard;
pub mod color;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod escape;
pub mod host;
pub mod keys;
pub mod platform;
pub mod runner;
pub mod scheduler;
pub mod width;
