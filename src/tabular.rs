//! Helpers for the tabular-store collaborator: A1-style column addressing
//! and a deterministic write throttle.
//!
//! The library never talks to a spreadsheet API itself; the orchestration
//! layer that does needs these two pieces to be testable without a clock or
//! a network.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Converts a 0-based column index to A1-style letters.
///
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`, `702 -> "AAA"`.
pub fn column_letter(index: usize) -> String {
    // Bijective base 26: subtract one before each digit so there is no zero.
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Sliding-window throttle for writes against a rate-limited store.
///
/// Explicit object instead of module-level counters: callers own it, pass it
/// by reference, and can reset it. `try_acquire_at` runs on a caller-supplied
/// millisecond timeline so tests drive time directly; `try_acquire` maps that
/// to wall time since construction.
#[derive(Debug)]
pub struct WriteThrottle {
    limit: usize,
    window_ms: u64,
    stamps: VecDeque<u64>,
    started: Instant,
}

impl WriteThrottle {
    /// Creates a throttle admitting `limit` writes per `window`.
    ///
    /// Panics if `limit` is zero — a throttle that can never admit a write
    /// is a programming error, not a runtime condition.
    pub fn new(limit: usize, window: Duration) -> Self {
        assert!(limit > 0, "throttle limit must be positive");
        Self {
            limit,
            window_ms: window.as_millis() as u64,
            stamps: VecDeque::with_capacity(limit),
            started: Instant::now(),
        }
    }

    /// Tries to take a write slot at `now_ms` on the caller's timeline.
    pub fn try_acquire_at(&mut self, now_ms: u64) -> bool {
        self.evict(now_ms);
        if self.stamps.len() < self.limit {
            self.stamps.push_back(now_ms);
            true
        } else {
            false
        }
    }

    /// Tries to take a write slot at the current wall time.
    pub fn try_acquire(&mut self) -> bool {
        let now_ms = self.started.elapsed().as_millis() as u64;
        self.try_acquire_at(now_ms)
    }

    /// How long past `now_ms` until a slot frees, or `None` if one is free
    /// now.
    pub fn wait_hint_at(&mut self, now_ms: u64) -> Option<Duration> {
        self.evict(now_ms);
        if self.stamps.len() < self.limit {
            return None;
        }
        let oldest = *self.stamps.front()?;
        Some(Duration::from_millis((oldest + self.window_ms).saturating_sub(now_ms)))
    }

    /// Forgets all recorded writes.
    pub fn reset(&mut self) {
        self.stamps.clear();
    }

    fn evict(&mut self, now_ms: u64) {
        while let Some(&oldest) = self.stamps.front() {
            if now_ms.saturating_sub(oldest) >= self.window_ms {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }
}
