// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The base subscriber capability.

use crate::error::{Result, RippleError};

/// Capability object receiving values from a [`Processor`](crate::Processor).
///
/// Only the processor's internal registration may invoke these callbacks;
/// the processor never shares the subscriber with anything else.
///
/// An `Err` (or a panic) out of [`on_value`](Self::on_value) evicts this
/// subscriber from its processor while every other subscriber keeps
/// receiving values.
pub trait Subscriber<V>: Send + Sync {
    /// Accept the next value.
    fn on_value(&self, value: V) -> Result<()>;

    /// Called when delivery to this subscriber failed, the processor saw a
    /// fatal error, or a subscription attempt was rejected.
    ///
    /// The default reports to the tracing sink of last resort and recovers.
    /// An `Err` out of this callback can no longer be attributed to this
    /// subscriber and is handed to the processor's fallback handler instead.
    fn on_error(&self, error: &RippleError) -> Result<()> {
        tracing::error!(target: "ripple", %error, "subscriber error went unhandled");
        Ok(())
    }

    /// Called once when the owning processor closes.
    fn on_close(&self) {}
}

/// Adapter turning a plain closure into a [`Subscriber`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ripple_core::{FnSubscriber, Processor};
///
/// let processor = Processor::<i32>::new();
/// processor.subscribe(Arc::new(FnSubscriber::new(
///     |value: i32| -> ripple_core::Result<()> {
///         println!("saw {value}");
///         Ok(())
///     },
/// )));
/// processor.submit(1);
/// ```
pub struct FnSubscriber<F> {
    callback: F,
}

impl<F> FnSubscriber<F> {
    /// Wrap `callback` as a subscriber's `on_value`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<V, F> Subscriber<V> for FnSubscriber<F>
where
    F: Fn(V) -> Result<()> + Send + Sync,
{
    fn on_value(&self, value: V) -> Result<()> {
        (self.callback)(value)
    }
}
