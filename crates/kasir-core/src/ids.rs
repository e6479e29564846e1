//! # Id Generation
//!
//! Every entity id in Kasir POS is a timestamp-based i64: the millisecond
//! Unix timestamp at creation. Two creations inside the same millisecond
//! would collide, so the generator keeps an atomic floor and hands out
//! `max(now_millis, last + 1)` - strictly increasing within a process.
//!
//! This is the single place the core reads a clock; every state
//! transition still takes its `now` explicitly.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Monotonic timestamp-id generator.
///
/// One instance is owned by the engine and shared wherever ids are
/// minted (products, cart lines, transactions, refunds).
#[derive(Debug, Default)]
pub struct IdGen {
    last: AtomicI64,
}

impl IdGen {
    pub fn new() -> Self {
        IdGen {
            last: AtomicI64::new(0),
        }
    }

    /// Returns the next id: current millisecond timestamp, bumped past
    /// the previously issued id when the clock hasn't moved.
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let gen = IdGen::new();
        let mut last = 0;
        for _ in 0..1000 {
            let id = gen.next();
            assert!(id > last, "id {} not greater than {}", id, last);
            last = id;
        }
    }

    #[test]
    fn test_ids_track_wall_clock() {
        let gen = IdGen::new();
        let before = Utc::now().timestamp_millis();
        let id = gen.next();
        assert!(id >= before);
    }
}
