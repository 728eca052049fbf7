// SPDX-License-Identifier: MIT
//
// Host configuration: fixed runtime parameters, bound once at startup.
//
// There are no command-line flags. The defaults reproduce the classic
// terminal host: 50 ms input polls, a caret that blinks every ten idle polls,
// immediate redraws, a blanked margin and full Unicode glyphs. The policy
// knobs can be overridden from the environment for terminals or tastes that
// need something else.

use std::time::Duration;

use th_term::palette::Palette;

use crate::color::default_palette;

// ─── Policies ────────────────────────────────────────────────────────────────

/// When to repaint after input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedrawPolicy {
    /// Repaint as soon as a key has been handled.
    #[default]
    Immediate,
    /// Mark the frame dirty and repaint on the next idle poll, coalescing
    /// bursts of input (pastes, key repeat) into one frame.
    Debounced,
}

/// What painting the margin background does to the cells under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarginPolicy {
    /// Overwrite each cell with a plain space in the default pair.
    #[default]
    Blank,
    /// Leave the cells untouched.
    Preserve,
}

/// Which codepoints reach the screen as themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphPolicy {
    /// Every codepoint is measured and drawn.
    #[default]
    Unicode,
    /// Codepoints above U+00FF are drawn as `?`, for terminals without
    /// wide-character support.
    Latin1,
}

// ─── HostConfig ──────────────────────────────────────────────────────────────

/// Environment variable overriding [`RedrawPolicy`].
pub const ENV_REDRAW: &str = "TERMHOST_REDRAW";
/// Environment variable overriding [`MarginPolicy`].
pub const ENV_MARGIN: &str = "TERMHOST_MARGIN";
/// Environment variable overriding [`GlyphPolicy`].
pub const ENV_GLYPHS: &str = "TERMHOST_GLYPHS";

#[derive(Debug, Clone, Copy)]
pub struct HostConfig {
    /// How long one input poll waits before counting as idle.
    pub poll_timeout: Duration,
    /// How long the escape decoder waits for the next byte of a sequence.
    pub escape_timeout: Duration,
    /// Consecutive idle polls between caret visibility toggles.
    pub blink_period: u32,
    pub redraw: RedrawPolicy,
    pub margin: MarginPolicy,
    pub glyphs: GlyphPolicy,
    pub palette: Palette,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            escape_timeout: Duration::from_millis(50),
            blink_period: 10,
            redraw: RedrawPolicy::default(),
            margin: MarginPolicy::default(),
            glyphs: GlyphPolicy::default(),
            palette: default_palette(),
        }
    }
}

impl HostConfig {
    /// Defaults with policy overrides read from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with policy overrides read through `lookup`. Unknown values
    /// are ignored with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_REDRAW) {
            match value.trim().to_ascii_lowercase().as_str() {
                "immediate" => config.redraw = RedrawPolicy::Immediate,
                "debounced" => config.redraw = RedrawPolicy::Debounced,
                other => warn_unknown(ENV_REDRAW, other),
            }
        }
        if let Some(value) = lookup(ENV_MARGIN) {
            match value.trim().to_ascii_lowercase().as_str() {
                "blank" => config.margin = MarginPolicy::Blank,
                "preserve" => config.margin = MarginPolicy::Preserve,
                other => warn_unknown(ENV_MARGIN, other),
            }
        }
        if let Some(value) = lookup(ENV_GLYPHS) {
            match value.trim().to_ascii_lowercase().as_str() {
                "unicode" => config.glyphs = GlyphPolicy::Unicode,
                "latin1" => config.glyphs = GlyphPolicy::Latin1,
                other => warn_unknown(ENV_GLYPHS, other),
            }
        }

        config
    }
}

fn warn_unknown(var: &str, value: &str) {
    tracing::warn!(target: "config", var, value, "unknown_policy_value_ignored");
}
