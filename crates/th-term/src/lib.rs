// SPDX-License-Identifier: MIT
//
// th-term: the character-cell terminal driver underneath termhost.
//
// This crate is the "terminal library" the host bridge paints into: a flat
// grid of cells that carry a codepoint plus an attribute word (color-pair
// index and style bits), a fixed pair palette, a differential renderer that
// emits only the cells that changed, and raw-mode terminal control with a
// timeout-capable byte source for input.
//
// No TUI framework sits underneath. Every escape sequence is written by the
// `ansi` module and every frame is diffed before it reaches the terminal.

pub mod ansi;
pub mod cell;
pub mod diff;
pub mod output;
pub mod palette;
pub mod reader;
pub mod screen;
pub mod terminal;
