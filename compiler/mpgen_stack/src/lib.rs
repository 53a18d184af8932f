//! Stack safety for deep type graphs.
//!
//! Schema collection recurses once per member, generic argument, and union
//! subtype. Long chains of nested declarations (generated DTO trees, deeply
//! nested generic instantiations) can exhaust the native stack, so every
//! recursive dispatch goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: no-op passthrough.
//!
//! [`DepthTracker`] records how deep a traversal went, for logging.

use std::cell::Cell;

/// Grow when less than this remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Tracks current and maximum recursion depth of one traversal.
#[derive(Debug, Default)]
pub struct DepthTracker {
    current: Cell<usize>,
    max: Cell<usize>,
}

impl DepthTracker {
    pub fn new() -> Self {
        DepthTracker::default()
    }

    /// Enter one level; the level is left when the guard drops.
    pub fn enter(&self) -> DepthGuard<'_> {
        let depth = self.current.get() + 1;
        self.current.set(depth);
        if depth > self.max.get() {
            self.max.set(depth);
        }
        DepthGuard { tracker: self }
    }

    /// Current depth.
    pub fn depth(&self) -> usize {
        self.current.get()
    }

    /// Deepest level reached so far.
    pub fn max_depth(&self) -> usize {
        self.max.get()
    }
}

/// Leaves a `DepthTracker` level on drop.
#[must_use = "the depth is released as soon as the guard is dropped"]
pub struct DepthGuard<'a> {
    tracker: &'a DepthTracker,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let current = self.tracker.current.get();
        self.tracker.current.set(current.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests;
