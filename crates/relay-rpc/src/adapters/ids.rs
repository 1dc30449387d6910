//! Correlation id generators.

use crate::ports::IdGenerator;
use relay_types::CorrelationId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Random UUID v4 ids. The production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> CorrelationId {
        CorrelationId::random()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... Deterministic; useful for tests and logs.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> CorrelationId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        CorrelationId::new(format!("{}-{}", self.prefix, n))
    }
}
