//! Circular dependency detection for runtime resolution.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 1024;

// Thread-local resolution path; resolution is synchronous call/return, so
// the stack mirrors the current recursion exactly.
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Guard tracking one frame of the resolution stack.
///
/// Entering a key already on the stack reports the cycle as the suffix of
/// the current path starting at that key, with the key appended again at
/// the end (e.g. `A -> B -> C -> A`).
pub(crate) struct ResolutionGuard {
    _priv: (),
}

impl ResolutionGuard {
    pub(crate) fn enter(key: &str) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack.iter().position(|k| k == key) {
                let mut path: Vec<String> = stack[start..].to_vec();
                path.push(key.to_string());
                return Err(DiError::Circular(path));
            }
            if stack.len() >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push(key.to_string());
            Ok(ResolutionGuard { _priv: () })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
