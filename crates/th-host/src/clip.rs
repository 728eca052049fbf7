// SPDX-License-Identifier: MIT
//
// Clip stack: nested render bounds for the view tree walk.
//
// Every view renders inside its parent's region. Entering a view pushes its
// bounds, given in the parent's local coordinates; the stack translates them
// by the parent's origin and intersects them with the parent, so the top of
// the stack is always an absolute screen rectangle fully inside everything
// below it. Leaving the view pops.
//
// A render pass is bracketed by `begin`/`end`, which establish the
// full-screen base rectangle and check that the walk left the stack empty.
// Misuse (pushing outside a pass, popping an empty stack, an unbalanced
// pass) is a bug in the walker and panics.

use th_term::screen::ClipRect;

#[derive(Debug, Default)]
pub struct ClipStack {
    screen: Option<ClipRect>,
    stack: Vec<ClipRect>,
}

impl ClipStack {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            screen: None,
            stack: Vec::new(),
        }
    }

    /// Start a render pass over `screen`.
    ///
    /// # Panics
    ///
    /// Panics if the stack is not empty.
    pub fn begin(&mut self, screen: ClipRect) {
        assert!(
            self.stack.is_empty(),
            "clip stack not empty at render entry (depth {})",
            self.stack.len()
        );
        self.screen = Some(screen);
    }

    /// Finish a render pass.
    ///
    /// # Panics
    ///
    /// Panics if pushes and pops were unbalanced.
    pub fn end(&mut self) {
        assert!(
            self.stack.is_empty(),
            "clip stack not empty at render exit (depth {})",
            self.stack.len()
        );
        self.screen = None;
    }

    /// Push `rect`, given relative to the current clip (or to the screen
    /// when the stack is empty). Returns the absolute clip now on top.
    ///
    /// # Panics
    ///
    /// Panics if called outside a render pass.
    pub fn push(&mut self, rect: ClipRect) -> ClipRect {
        let Some(screen) = self.screen else {
            panic!("clip push outside a render pass");
        };
        let parent = self.stack.last().copied().unwrap_or(screen);
        let clip = rect.translate(parent.x, parent.y).clamp_to(parent);
        self.stack.push(clip);
        clip
    }

    /// Pop the top clip.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop(&mut self) -> ClipRect {
        self.stack.pop().unwrap_or_else(|| panic!("clip pop on an empty stack"))
    }

    /// The absolute clip all painting is currently confined to.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[must_use]
    pub fn current(&self) -> ClipRect {
        *self
            .stack
            .last()
            .unwrap_or_else(|| panic!("no current clip: stack is empty"))
    }

    /// Nesting depth.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The screen rectangle of the pass in progress.
    #[inline]
    #[must_use]
    pub const fn screen(&self) -> Option<ClipRect> {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pass() -> ClipStack {
        let mut clip = ClipStack::new();
        clip.begin(ClipRect::new(0, 0, 80, 24));
        clip
    }

    #[test]
    fn push_translates_and_intersects() {
        let mut clip = pass();
        assert_eq!(clip.push(ClipRect::new(10, 2, 30, 10)), ClipRect::new(10, 2, 30, 10));
        // Child at local (5, 5) sized past the parent's edge.
        assert_eq!(clip.push(ClipRect::new(5, 5, 100, 100)), ClipRect::new(15, 7, 25, 5));
        assert_eq!(clip.depth(), 2);
        clip.pop();
        clip.pop();
        clip.end();
    }

    #[test]
    fn push_then_pop_restores_top_and_depth() {
        let mut clip = pass();
        clip.push(ClipRect::new(1, 1, 10, 10));
        let (top, depth) = (clip.current(), clip.depth());

        clip.push(ClipRect::new(2, 2, 3, 3));
        clip.pop();

        assert_eq!(clip.current(), top);
        assert_eq!(clip.depth(), depth);
        clip.pop();
        clip.end();
    }

    #[test]
    fn disjoint_child_is_empty() {
        let mut clip = pass();
        clip.push(ClipRect::new(0, 0, 10, 10));
        let child = clip.push(ClipRect::new(50, 50, 5, 5));
        assert!(child.is_empty());
        clip.pop();
        clip.pop();
        clip.end();
    }

    #[test]
    fn negative_offsets_are_clipped() {
        let mut clip = pass();
        let top = clip.push(ClipRect::new(-3, -1, 10, 5));
        assert_eq!(top, ClipRect::new(0, 0, 7, 4));
        clip.pop();
        clip.end();
    }

    #[test]
    fn offsets_at_the_ends_of_i32_collapse_to_the_parent_edge() {
        let mut clip = pass();
        clip.push(ClipRect::new(10, 2, 30, 10));
        assert_eq!(clip.push(ClipRect::new(i32::MAX, i32::MAX, 5, 5)), ClipRect::new(40, 12, 0, 0));
        clip.pop();
        assert_eq!(clip.push(ClipRect::new(i32::MIN, i32::MIN, 5, 5)), ClipRect::new(10, 2, 0, 0));
        clip.pop();
        clip.pop();
        clip.end();
    }

    #[test]
    #[should_panic(expected = "outside a render pass")]
    fn push_before_begin_panics() {
        ClipStack::new().push(ClipRect::new(0, 0, 1, 1));
    }

    #[test]
    #[should_panic(expected = "empty stack")]
    fn pop_empty_panics() {
        pass().pop();
    }

    #[test]
    #[should_panic(expected = "stack is empty")]
    fn current_empty_panics() {
        let _ = pass().current();
    }

    #[test]
    #[should_panic(expected = "render exit")]
    fn unbalanced_end_panics() {
        let mut clip = pass();
        clip.push(ClipRect::new(0, 0, 1, 1));
        clip.end();
    }
}
