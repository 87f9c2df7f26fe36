// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! All-or-nothing delivery: the transactional processor.
//!
//! Each submission runs a two-phase protocol over the registrations that
//! existed when it started: propose to everyone, then commit everywhere or
//! roll back everywhere. A submitted value is observed by all subscribers or
//! by none, never by a mix.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::disposable::{Disposable, NoOpDisposable};
use crate::error::{protect, Result, RippleError};
use crate::executor::{Executor, InlineExecutor};
use crate::processor::ProcessorCore;
use crate::registration::{Registration, TransactionalRegistration};
use crate::registry::Registered;
use crate::subscriber::Subscriber;
use crate::transaction::{TransactionFailed, TransactionalSubscriber};

/// Processor specialization running the two-phase protocol over all current
/// registrations before a submitted value becomes anyone's current value.
///
/// Cloning is cheap; clones share state, including the submission lock that
/// serializes `submit` calls.
pub struct TransactionalProcessor<V: Clone + Send + Sync + 'static> {
    core: Arc<ProcessorCore<V, TransactionalRegistration<V>>>,
    submit_lock: Arc<Mutex<()>>,
}

impl<V: Clone + Send + Sync + 'static> TransactionalProcessor<V> {
    /// Transactional processor bound to the [`InlineExecutor`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(Arc::new(InlineExecutor))
    }

    /// Transactional processor bound to `executor`.
    #[must_use]
    pub fn with_executor(executor: Arc<dyn Executor>) -> Self {
        Self {
            core: ProcessorCore::new(executor),
            submit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Register `subscriber` for future submissions.
    ///
    /// A subscriber registered while a submission is in flight joins from
    /// the next submission on; it never joins a transaction in progress. On
    /// a closed processor the subscriber is rejected with
    /// [`RippleError::Closed`] through its `on_error`.
    pub fn subscribe(
        &self,
        subscriber: Arc<dyn TransactionalSubscriber<V>>,
    ) -> Box<dyn Disposable> {
        match self
            .core
            .register(|id| TransactionalRegistration::new(id, Arc::clone(&subscriber)))
        {
            Ok(subscription) => Box::new(subscription),
            Err(error) => {
                if let Err(secondary) = protect(|| subscriber.on_error(&error)) {
                    self.core.report_unattributed(&secondary);
                }
                Box::new(NoOpDisposable)
            }
        }
    }

    /// Submit `value` through the two-phase protocol.
    ///
    /// Every live registration is asked to stage the value, in subscription
    /// order and regardless of earlier rejections, so failure is observed
    /// uniformly. If all accept, every one commits and the staged value
    /// becomes current everywhere. If any rejects, every registration still
    /// attached rolls back — including the rejector — no current value
    /// changes anywhere, and the first rejection comes back as
    /// [`RippleError::Transaction`]. A rejection is a per-submission event:
    /// nobody is evicted and the processor stays open.
    ///
    /// Submissions against the same processor are serialized, and the set of
    /// participants is frozen when the propose phase starts; registrations
    /// disposed mid-submission are skipped in later phases.
    pub fn submit(&self, value: V) -> Result<()> {
        let _serialized = self.submit_lock.lock();
        let participants = self.core.snapshot();

        let mut failure: Option<TransactionFailed> = None;
        for registration in &participants {
            if registration.is_disposed() {
                continue;
            }
            if let Err(failed) = registration.propose(value.clone()) {
                if failure.is_none() {
                    failure = Some(failed);
                } else {
                    tracing::debug!(
                        target: "ripple",
                        error = %failed,
                        "further rejection in an already-failed submission"
                    );
                }
            }
        }

        let Some(failed) = failure else {
            for registration in &participants {
                if registration.is_disposed() {
                    continue;
                }
                if let Err(error) = registration.commit() {
                    // A subscriber that cannot commit is no longer consistent
                    // with the group.
                    self.core.remove(registration.id());
                    if let Err(secondary) = registration.on_error(&error) {
                        self.core.report_unattributed(&secondary);
                    }
                }
            }
            return Ok(());
        };

        for registration in &participants {
            if registration.is_disposed() {
                continue;
            }
            if let Err(error) = registration.rollback() {
                self.core.report_unattributed(&error);
            }
        }
        Err(RippleError::Transaction(failed))
    }

    /// Deliver `error` to every subscriber, then close.
    pub fn fail(&self, error: &RippleError) {
        self.core.fail(error);
    }

    /// Close the processor: notify every subscriber once and reject all
    /// future subscriptions. Scheduled through the executor; irreversible.
    pub fn close(&self) {
        self.core.close();
    }

    /// Close only if nobody is subscribed when the scheduled check runs.
    ///
    /// Returns immediately whether the processor is already closed or will
    /// close.
    pub fn close_if_unsubscribed(&self) -> bool {
        self.core.close_if_unsubscribed()
    }

    /// `true` iff at least one subscription is active.
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.core.has_subscribers()
    }

    /// Number of active subscriptions; zero once closed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.core.subscriber_count()
    }

    /// `true` once the processor has closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Install (or, with `None`, remove) the handler receiving errors that
    /// cannot be attributed to any single registration.
    pub fn set_fallback_handler(&self, handler: Option<Arc<dyn Subscriber<V>>>) {
        self.core.set_fallback_handler(handler);
    }
}

impl<V: Clone + Send + Sync + 'static> Default for TransactionalProcessor<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> Clone for TransactionalProcessor<V> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            submit_lock: Arc::clone(&self.submit_lock),
        }
    }
}

// A transactional processor is a subscriber whose `on_value` propagates the
// transactional outcome, so rejected submissions surface upstream.
impl<V: Clone + Send + Sync + 'static> Subscriber<V> for TransactionalProcessor<V> {
    fn on_value(&self, value: V) -> Result<()> {
        self.submit(value)
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        self.fail(error);
        Ok(())
    }

    fn on_close(&self) {
        self.close();
    }
}
