// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the ripple notification core.
//!
//! [`RippleError`] is the root error type for everything a processor or
//! subscriber can report. Subscriber callbacks return it, delivery loops
//! route it, and a transactional submission surfaces its rejection through
//! the [`Transaction`](RippleError::Transaction) variant.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::transaction::TransactionFailed;

/// Root error type for all ripple operations.
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// The processor has been closed and permanently rejects new subscribers.
    #[error("processor is already closed")]
    Closed,

    /// A subscriber callback failed while a value or error was being
    /// delivered to it.
    ///
    /// On a plain processor this is isolated to the one failing subscriber;
    /// on a transactional processor a failure during the propose phase
    /// aborts the whole submission instead.
    #[error("delivery to subscriber failed: {0}")]
    Delivery(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A transactional submission was rejected during its propose phase.
    ///
    /// The processor stays open and usable; no subscriber's current value
    /// changed.
    #[error(transparent)]
    Transaction(#[from] TransactionFailed),
}

impl RippleError {
    /// Wrap a subscriber-produced error as a delivery failure.
    pub fn delivery(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Box::new(error))
    }

    /// A delivery failure described by a plain message.
    pub fn delivery_msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Delivery(message.into())
    }
}

/// Specialized `Result` for ripple operations.
pub type Result<T> = std::result::Result<T, RippleError>;

/// Render a panic payload into a readable message.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run a subscriber callback, folding panics into delivery failures so a
/// misbehaving subscriber can never unwind through a dispatch loop.
pub(crate) fn protect(callback: impl FnOnce() -> Result<()>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(callback)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(RippleError::delivery_msg(panic_message(payload))),
    }
}
