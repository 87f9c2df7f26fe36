// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording subscriber with fault injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use ripple_core::{Result, RippleError, Subscriber};

/// Subscriber that records everything it receives and can be told to fail.
///
/// `fail_values(true)` makes every `on_value` return an error, so the owning
/// processor should evict this subscriber. `fail_errors(true)` makes
/// `on_error` itself fail, turning any reported failure into a secondary
/// failure for the processor's fallback handler.
pub struct RecordingSubscriber<V> {
    values: Mutex<Vec<V>>,
    errors: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_values: AtomicBool,
    fail_errors: AtomicBool,
}

impl<V> Default for RecordingSubscriber<V> {
    fn default() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_values: AtomicBool::new(false),
            fail_errors: AtomicBool::new(false),
        }
    }
}

impl<V: Clone> RecordingSubscriber<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values received so far, in delivery order.
    pub fn values(&self) -> Vec<V> {
        self.values.lock().clone()
    }

    /// Rendered errors received so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// How many times `on_close` ran.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }

    /// Make every `on_value` fail while set.
    pub fn fail_values(&self, fail: bool) {
        self.fail_values.store(fail, Ordering::Release);
    }

    /// Make every `on_error` fail while set.
    pub fn fail_errors(&self, fail: bool) {
        self.fail_errors.store(fail, Ordering::Release);
    }
}

impl<V: Clone + Send> Subscriber<V> for RecordingSubscriber<V> {
    fn on_value(&self, value: V) -> Result<()> {
        if self.fail_values.load(Ordering::Acquire) {
            return Err(RippleError::delivery_msg("injected delivery failure"));
        }
        self.values.lock().push(value);
        Ok(())
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        self.errors.lock().push(error.to_string());
        if self.fail_errors.load(Ordering::Acquire) {
            return Err(RippleError::delivery_msg("injected error-handler failure"));
        }
        Ok(())
    }

    fn on_close(&self) {
        self.closes.fetch_add(1, Ordering::AcqRel);
    }
}
