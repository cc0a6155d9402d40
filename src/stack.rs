//! Recursion guard for the parser, checker and evaluator.
//!
//! Deeply nested expressions recurse through the host call stack. Instead of
//! relying on a fixed stack size, every recursive entry point runs through
//! [`ensure_sufficient_stack`], which grows the stack on demand.

/// If less than this remains, the stack is grown before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
