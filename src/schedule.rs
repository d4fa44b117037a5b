//! A cancellable list of scheduled animation phases.
//!
//! Timer-chained animation phases are data, not callbacks: each entry pairs
//! a phase value with an absolute deadline and the sequence token that was
//! current when it was scheduled. `invalidate` bumps the token, so a phase
//! that fires after an intervening cancellation is dropped without effect.
//! The queue is polled from the UI update loop against `Instant::now()`.

use log::trace;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Scheduled<T> {
    fire_at: Instant,
    token: u64,
    phase: T,
}

/// Ordered, cancellable set of pending phases.
#[derive(Debug)]
pub struct PhaseQueue<T> {
    entries: Vec<Scheduled<T>>,
    token: u64,
}

impl<T: std::fmt::Debug> PhaseQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            token: 0,
        }
    }

    /// Schedules `phase` to fire at `now + delay` under the current token.
    pub fn schedule(&mut self, now: Instant, delay: Duration, phase: T) {
        trace!("Scheduling phase {:?} in {:?} (token {})", phase, delay, self.token);
        self.entries.push(Scheduled {
            fire_at: now + delay,
            token: self.token,
            phase,
        });
    }

    /// Invalidates every pending entry by bumping the sequence token.
    ///
    /// Entries are removed lazily on the next `poll`; an invalidated entry
    /// whose deadline passes is a no-op.
    pub fn invalidate(&mut self) {
        self.token += 1;
        trace!(
            "Invalidated phase queue; token now {}, {} stale entr(y/ies) pending",
            self.token,
            self.entries.len()
        );
    }

    /// Removes every entry whose deadline has passed and returns the phases
    /// that are still valid, in deadline order (insertion order for ties).
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        let current_token = self.token;
        let mut due: Vec<Scheduled<T>> = Vec::new();
        let mut remaining: Vec<Scheduled<T>> = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.fire_at <= now {
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;
        due.sort_by_key(|e| e.fire_at);
        due.into_iter()
            .filter(|e| {
                if e.token == current_token {
                    true
                } else {
                    trace!("Dropping stale phase {:?} (token {} != {})", e.phase, e.token, current_token);
                    false
                }
            })
            .map(|e| e.phase)
            .collect()
    }

    /// Whether any entry (valid or stale) is still pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry scheduled under the current token is pending.
    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(|e| e.token == self.token)
    }
}

impl<T: std::fmt::Debug> Default for PhaseQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
