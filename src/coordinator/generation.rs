//! Generation tokens for cooperative, multi-tick operations. Each operation
//! captures a token when it starts and checks it every time it resumes;
//! bumping the counter invalidates every older token at once.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Rc<Cell<u64>>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.get()
    }

    /// Token for an operation starting now.
    pub fn token(&self) -> GenerationToken {
        GenerationToken {
            issued: self.current.get(),
            counter: Rc::clone(&self.current),
        }
    }

    /// Invalidate all outstanding tokens. Returns the new generation.
    pub fn bump(&self) -> u64 {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        next
    }
}

#[derive(Debug, Clone)]
pub struct GenerationToken {
    issued: u64,
    counter: Rc<Cell<u64>>,
}

impl GenerationToken {
    pub fn generation(&self) -> u64 {
        self.issued
    }

    pub fn is_current(&self) -> bool {
        self.counter.get() == self.issued
    }

    pub fn is_stale(&self) -> bool {
        !self.is_current()
    }
}
