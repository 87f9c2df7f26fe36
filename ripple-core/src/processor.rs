// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The plain processor: fan-out delivery with per-subscriber fault isolation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::disposable::{Disposable, NoOpDisposable};
use crate::error::{protect, Result, RippleError};
use crate::executor::{Executor, InlineExecutor};
use crate::lifecycle::Lifecycle;
use crate::registration::{Registration, ValueRegistration};
use crate::registry::{Registered, Registry};
use crate::subscriber::Subscriber;

/// State shared by a processor, its clones and its disposal handles.
///
/// Generic over the registration kind so the plain and the transactional
/// processor share the lifecycle, registry and fault-isolation machinery.
pub(crate) struct ProcessorCore<V, R> {
    lifecycle: Lifecycle,
    registry: Registry<R>,
    fallback: RwLock<Option<Arc<dyn Subscriber<V>>>>,
    executor: Arc<dyn Executor>,
    next_id: AtomicU64,
}

impl<V: 'static, R: Registration<V> + 'static> ProcessorCore<V, R> {
    pub(crate) fn new(executor: Arc<dyn Executor>) -> Arc<Self> {
        Arc::new(Self {
            lifecycle: Lifecycle::new(),
            registry: Registry::new(),
            fallback: RwLock::new(None),
            executor,
            next_id: AtomicU64::new(0),
        })
    }

    /// Reserve a lifecycle slot and insert the registration `build` creates.
    ///
    /// `Err(Closed)` means no registration was created and the caller must
    /// reject the subscriber itself.
    pub(crate) fn register(
        self: &Arc<Self>,
        build: impl FnOnce(u64) -> R,
    ) -> Result<Subscription<V, R>> {
        if !self.lifecycle.try_register() {
            return Err(RippleError::Closed);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.insert(Arc::new(build(id)));
        Ok(Subscription {
            core: Arc::downgrade(self),
            id,
        })
    }

    /// Remove `id` from the registry, releasing its lifecycle slot exactly
    /// once no matter how often disposal and eviction race.
    pub(crate) fn remove(&self, id: u64) {
        let Some(registration) = self.registry.get(id) else {
            return;
        };
        if registration.try_dispose() {
            self.registry.remove(id);
            self.lifecycle.release();
        }
    }

    /// Run `action` against every live registration, evicting the ones whose
    /// callback fails and reporting the failure back to them.
    ///
    /// A failing registration never stops delivery to the remaining ones,
    /// and a failure while reporting the failure goes to the fallback
    /// handler rather than escaping the loop.
    pub(crate) fn for_each_or_remove(&self, mut action: impl FnMut(&R) -> Result<()>) {
        for registration in self.registry.snapshot() {
            if registration.is_disposed() {
                continue;
            }
            if let Err(error) = action(&registration) {
                self.remove(registration.id());
                if let Err(secondary) = registration.on_error(&error) {
                    self.report_unattributed(&secondary);
                }
            }
        }
    }

    /// Report an error nobody else can handle: the fallback handler if one
    /// is installed, the tracing sink otherwise. Never escapes.
    pub(crate) fn report_unattributed(&self, error: &RippleError) {
        let fallback = self.fallback.read().clone();
        match fallback {
            Some(handler) => {
                if let Err(error) = protect(|| handler.on_error(error)) {
                    tracing::error!(target: "ripple", %error, "fallback handler failed");
                }
            }
            None => tracing::error!(target: "ripple", %error, "unhandled subscriber error"),
        }
    }

    pub(crate) fn set_fallback_handler(&self, handler: Option<Arc<dyn Subscriber<V>>>) {
        *self.fallback.write() = handler;
    }

    /// Deliver `error` to every registration, then close. An error is fatal
    /// to the processor as a whole, not to one subscriber.
    pub(crate) fn fail(self: &Arc<Self>, error: &RippleError) {
        for registration in self.registry.snapshot() {
            if registration.is_disposed() {
                continue;
            }
            if let Err(secondary) = registration.on_error(error) {
                self.report_unattributed(&secondary);
            }
        }
        self.close();
    }

    /// Pin the closed sentinel and notify every registration, as one unit of
    /// executor work so the close serializes against other work scheduled on
    /// the same executor.
    pub(crate) fn close(self: &Arc<Self>) {
        let core = Arc::clone(self);
        self.executor.execute(Box::new(move || {
            core.lifecycle.close();
            for registration in core.registry.drain() {
                registration.on_close();
            }
        }));
    }

    /// Schedule a close that only fires if no subscriber is registered when
    /// the check runs; report whether this processor is closed or will close.
    pub(crate) fn close_if_unsubscribed(self: &Arc<Self>) -> bool {
        let core = Arc::clone(self);
        self.executor.execute(Box::new(move || {
            if core.lifecycle.close_if_idle() {
                for registration in core.registry.drain() {
                    registration.on_close();
                }
            }
        }));
        self.lifecycle.idle_or_closed()
    }

    pub(crate) fn has_subscribers(&self) -> bool {
        self.lifecycle.has_subscribers()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lifecycle.subscriber_count()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<R>> {
        self.registry.snapshot()
    }
}

/// Disposal handle returned by `subscribe`.
///
/// Holds only a weak reference: an outstanding handle never keeps a
/// processor alive, and disposing after the processor is gone is a no-op.
pub(crate) struct Subscription<V, R> {
    core: Weak<ProcessorCore<V, R>>,
    id: u64,
}

impl<V: 'static, R: Registration<V> + 'static> Disposable for Subscription<V, R> {
    fn dispose(&self) {
        if let Some(core) = self.core.upgrade() {
            core.remove(self.id);
        }
    }
}

/// Fan-out processor delivering each submitted value to every live
/// subscriber.
///
/// Cloning is cheap; all clones share the same state. Subscribers whose
/// callbacks fail are evicted and notified without disturbing the rest, and
/// closing is a one-way transition: a closed processor rejects every later
/// subscription attempt, forever.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use ripple_core::{Disposable, FnSubscriber, Processor};
///
/// let processor = Processor::<i32>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let subscription = processor.subscribe(Arc::new(FnSubscriber::new(
///     move |value: i32| -> ripple_core::Result<()> {
///         sink.lock().unwrap().push(value);
///         Ok(())
///     },
/// )));
///
/// processor.submit(1);
/// processor.submit(2);
/// subscription.dispose();
/// processor.submit(3);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Processor<V: Clone + Send + Sync + 'static> {
    core: Arc<ProcessorCore<V, ValueRegistration<V>>>,
}

impl<V: Clone + Send + Sync + 'static> Processor<V> {
    /// Processor bound to the [`InlineExecutor`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(Arc::new(InlineExecutor))
    }

    /// Processor bound to `executor`; close and cleanup work is scheduled
    /// there.
    #[must_use]
    pub fn with_executor(executor: Arc<dyn Executor>) -> Self {
        Self {
            core: ProcessorCore::new(executor),
        }
    }

    /// Register `subscriber` for future values.
    ///
    /// On a closed processor the subscriber is rejected with
    /// [`RippleError::Closed`] through its `on_error` and a no-op handle
    /// comes back. A subscribe racing a close deterministically ends either
    /// rejected or registered-then-closed, never half-open.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<V>>) -> Box<dyn Disposable> {
        match self
            .core
            .register(|id| ValueRegistration::new(id, Arc::clone(&subscriber)))
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

    /// Deliver `value` to every live subscriber.
    ///
    /// A subscriber whose callback fails is evicted and told via its
    /// `on_error`; the remaining subscribers still receive this and all
    /// future values.
    pub fn submit(&self, value: V) {
        self.core
            .for_each_or_remove(|registration| registration.deliver(value.clone()));
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
    /// Returns immediately — before the check necessarily ran — whether the
    /// processor is already closed or will close.
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

impl<V: Clone + Send + Sync + 'static> Default for Processor<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> Clone for Processor<V> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

// Processors are subscribers themselves, so one processor's output can feed
// another's input.
impl<V: Clone + Send + Sync + 'static> Subscriber<V> for Processor<V> {
    fn on_value(&self, value: V) -> Result<()> {
        self.submit(value);
        Ok(())
    }

    fn on_error(&self, error: &RippleError) -> Result<()> {
        self.fail(error);
        Ok(())
    }

    fn on_close(&self) {
        self.close();
    }
}
