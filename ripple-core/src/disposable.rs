// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscription cancellation handles.

/// Handle used to cancel one subscription.
///
/// Disposal is explicit: dropping the handle without calling
/// [`dispose`](Self::dispose) leaves the subscription active.
pub trait Disposable: Send + Sync {
    /// Remove the associated registration from its processor.
    ///
    /// Idempotent; a second call is a no-op and the subscriber counter is
    /// never decremented twice.
    fn dispose(&self);
}

/// Handle returned when no registration was created, e.g. for a subscription
/// attempt against a closed processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDisposable;

impl Disposable for NoOpDisposable {
    fn dispose(&self) {}
}
