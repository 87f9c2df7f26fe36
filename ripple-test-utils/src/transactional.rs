// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Transactional recorder fixture.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use ripple_core::{Result, RippleError, TransactionFailed, TransactionalSubscriber};

/// Transactional subscriber with an observable current/staged value pair.
///
/// Mirrors how a configuration holder consumes transactional updates: a
/// proposed value parks in `staged` until a commit makes it current or a
/// rollback discards it. `reject(true)` makes every propose fail until
/// reset.
pub struct TransactionalRecorder<V> {
    current: Mutex<Option<V>>,
    staged: Mutex<Option<V>>,
    reject: AtomicBool,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl<V> Default for TransactionalRecorder<V> {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
            staged: Mutex::new(None),
            reject: AtomicBool::new(false),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
            errors: Mutex::new(Vec::new()),
        }
    }
}

impl<V: Clone> TransactionalRecorder<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed value, if any submission ever succeeded.
    pub fn current(&self) -> Option<V> {
        self.current.lock().clone()
    }

    /// The staged value of an in-flight transaction, if any.
    pub fn staged(&self) -> Option<V> {
        self.staged.lock().clone()
    }

    /// How many times `commit` ran.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::Acquire)
    }

    /// How many times `rollback` ran.
    pub fn rollback_count(&self) -> usize {
        self.rollbacks.load(Ordering::Acquire)
    }

    /// Rendered errors received so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Reject every proposal while set.
    pub fn reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::Release);
    }
}

impl<V: Clone + Send> TransactionalSubscriber<V> for TransactionalRecorder<V> {
    fn begin_transaction(&self, value: V) -> std::result::Result<(), TransactionFailed> {
        if self.reject.load(Ordering::Acquire) {
            return Err(TransactionFailed::new());
        }
        *self.staged.lock() = Some(value);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if let Some(value) = self.staged.lock().take() {
            *self.current.lock() = Some(value);
        }
        self.commits.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.staged.lock().take();
        self.rollbacks.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        self.errors.lock().push(error.to_string());
        Ok(())
    }
}
