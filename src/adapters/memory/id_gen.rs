//! Predictable identifiers.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::IdGenerator;

/// Produces `run-1`, `run-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl IdGenerator for SequentialIds {
    fn generate_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("run-{n}")
    }
}
