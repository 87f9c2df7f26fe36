// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-way lifecycle counter for processors.
//!
//! A single atomic encodes both "open with N subscribers" and the terminal
//! "closed" state, so a subscribe racing a close resolves deterministically
//! without a lock around either operation.

use std::sync::atomic::{AtomicI64, Ordering};

// Far enough below zero that releases racing a close can never walk the
// state back across it.
const CLOSED: i64 = i64::MIN / 2;

/// Atomic subscriber-count and closed-state cell.
///
/// States are `Open(n)` for `n >= 0` and terminal `Closed`. Every transition
/// is a compare-and-swap against the current state; `Closed` has no outgoing
/// transitions, so once a processor is closed it can never reopen.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AtomicI64,
}

impl Lifecycle {
    /// A fresh, open cell with zero subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve one subscriber slot.
    ///
    /// Returns `false` without touching the count if the cell is closed —
    /// including when a concurrent close lands mid-attempt.
    pub fn try_register(&self) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current < 0 {
                return false;
            }
            match self.state.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Release one subscriber slot. No-op once closed or already at zero.
    pub fn release(&self) {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current <= 0 {
                return;
            }
            match self.state.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Pin the cell to `Closed`. Idempotent.
    pub fn close(&self) {
        self.state.store(CLOSED, Ordering::Release);
    }

    /// Close only if no subscriber slot is held right now.
    ///
    /// Returns whether this call performed the transition.
    pub fn close_if_idle(&self) -> bool {
        self.state
            .compare_exchange(0, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// `true` once [`close`](Self::close) or a successful
    /// [`close_if_idle`](Self::close_if_idle) has run.
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) < 0
    }

    /// `true` iff at least one subscriber slot is held.
    pub fn has_subscribers(&self) -> bool {
        self.state.load(Ordering::Acquire) > 0
    }

    /// Number of held subscriber slots; zero once closed.
    pub fn subscriber_count(&self) -> usize {
        usize::try_from(self.state.load(Ordering::Acquire).max(0)).unwrap_or(0)
    }

    /// `true` if the cell is closed or a conditional close would succeed.
    pub fn idle_or_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) <= 0
    }
}
