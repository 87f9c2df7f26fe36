// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-subscriber registrations.
//!
//! A registration mediates every call into its subscriber so failures can be
//! isolated and the subscriber removed without corrupting the registry. No
//! registration is invoked after it has been removed from the owning set.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{panic_message, protect, Result, RippleError};
use crate::registry::Registered;
use crate::subscriber::Subscriber;
use crate::transaction::{TransactionFailed, TransactionalSubscriber};

/// Surface the processor core needs from a registration, independent of
/// which subscriber capability it wraps.
pub(crate) trait Registration<V>: Registered {
    /// Mark disposed. The first caller wins; later disposals are no-ops.
    fn try_dispose(&self) -> bool;

    fn is_disposed(&self) -> bool;

    /// Forward an error to the subscriber. An `Err` here is a secondary
    /// failure the caller must hand to the fallback handler.
    fn on_error(&self, error: &RippleError) -> Result<()>;

    /// Forward the close notification. Failures are swallowed; there is no
    /// recovery action left at this point.
    fn on_close(&self);
}

/// Registration wrapping a plain [`Subscriber`].
pub(crate) struct ValueRegistration<V> {
    id: u64,
    subscriber: Arc<dyn Subscriber<V>>,
    disposed: AtomicBool,
}

impl<V> ValueRegistration<V> {
    pub(crate) fn new(id: u64, subscriber: Arc<dyn Subscriber<V>>) -> Self {
        Self {
            id,
            subscriber,
            disposed: AtomicBool::new(false),
        }
    }

    /// Forward a value. An `Err` (or panic) means this registration must be
    /// evicted by the caller.
    pub(crate) fn deliver(&self, value: V) -> Result<()> {
        protect(|| self.subscriber.on_value(value))
    }
}

impl<V> Registered for ValueRegistration<V> {
    fn id(&self) -> u64 {
        self.id
    }
}

impl<V> Registration<V> for ValueRegistration<V> {
    fn try_dispose(&self) -> bool {
        self.disposed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        protect(|| self.subscriber.on_error(error))
    }

    fn on_close(&self) {
        if let Err(error) = protect(|| {
            self.subscriber.on_close();
            Ok(())
        }) {
            tracing::debug!(target: "ripple", %error, "subscriber failed during close");
        }
    }
}

/// Registration wrapping a [`TransactionalSubscriber`].
pub(crate) struct TransactionalRegistration<V> {
    id: u64,
    subscriber: Arc<dyn TransactionalSubscriber<V>>,
    disposed: AtomicBool,
}

impl<V> TransactionalRegistration<V> {
    pub(crate) fn new(id: u64, subscriber: Arc<dyn TransactionalSubscriber<V>>) -> Self {
        Self {
            id,
            subscriber,
            disposed: AtomicBool::new(false),
        }
    }

    /// Ask the subscriber to stage `value`. A panic counts as a rejection
    /// with the panic message as its cause.
    pub(crate) fn propose(&self, value: V) -> std::result::Result<(), TransactionFailed> {
        match catch_unwind(AssertUnwindSafe(|| self.subscriber.begin_transaction(value))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(TransactionFailed::from_message(panic_message(payload))),
        }
    }

    pub(crate) fn commit(&self) -> Result<()> {
        protect(|| self.subscriber.commit())
    }

    pub(crate) fn rollback(&self) -> Result<()> {
        protect(|| self.subscriber.rollback())
    }
}

impl<V> Registered for TransactionalRegistration<V> {
    fn id(&self) -> u64 {
        self.id
    }
}

impl<V> Registration<V> for TransactionalRegistration<V> {
    fn try_dispose(&self) -> bool {
        self.disposed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        protect(|| self.subscriber.on_error(error))
    }

    fn on_close(&self) {
        if let Err(error) = protect(|| {
            self.subscriber.on_close();
            Ok(())
        }) {
            tracing::debug!(target: "ripple", %error, "subscriber failed during close");
        }
    }
}
