// SPDX-License-Identifier: MIT
//
// Frame scheduler: decides, once per poll, whether to repaint.
//
// The run loop wakes up either because a key arrived or because the poll
// timed out. Keys always make the carets visible and restart the blink
// count; under the immediate policy they also repaint right away, under the
// debounced policy they only mark the frame dirty and the next quiet poll
// repaints. Quiet polls with nothing dirty count toward the blink period,
// and every full period flips the carets and repaints once.

use crate::config::RedrawPolicy;

/// The scheduler's verdict for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    Redraw,
    Idle,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    policy: RedrawPolicy,
    blink_period: u32,
    invalidated: bool,
    idle_polls: u32,
    carets_visible: bool,
}

impl FrameScheduler {
    #[must_use]
    pub const fn new(policy: RedrawPolicy, blink_period: u32) -> Self {
        Self {
            policy,
            blink_period,
            invalidated: false,
            idle_polls: 0,
            carets_visible: true,
        }
    }

    /// A key was handled.
    pub const fn on_key(&mut self) -> FrameDecision {
        self.carets_visible = true;
        self.idle_polls = 0;
        self.invalidated = true;
        match self.policy {
            RedrawPolicy::Immediate => self.redraw(),
            RedrawPolicy::Debounced => FrameDecision::Idle,
        }
    }

    /// A poll timed out with no input.
    pub const fn on_timeout(&mut self) -> FrameDecision {
        if self.invalidated {
            return self.redraw();
        }
        self.idle_polls += 1;
        if self.idle_polls >= self.blink_period {
            self.idle_polls = 0;
            self.carets_visible = !self.carets_visible;
            return self.redraw();
        }
        FrameDecision::Idle
    }

    /// The terminal changed size. Always repaints.
    pub const fn on_resize(&mut self) -> FrameDecision {
        self.redraw()
    }

    /// Something changed appearance; repaint at the next opportunity.
    pub const fn invalidate(&mut self) {
        self.invalidated = true;
    }

    #[must_use]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    #[must_use]
    pub const fn carets_visible(&self) -> bool {
        self.carets_visible
    }

    #[must_use]
    pub const fn policy(&self) -> RedrawPolicy {
        self.policy
    }

    const fn redraw(&mut self) -> FrameDecision {
        self.invalidated = false;
        FrameDecision::Redraw
    }
}
