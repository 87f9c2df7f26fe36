// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The transactional subscription capability.
//!
//! A [`TransactionalSubscriber`] receives each value twice: once as a
//! proposal it may reject, and once as a commit or rollback decision made
//! after every other subscriber has seen the same proposal. The staged value
//! lives inside the subscriber between the two calls and is never persisted
//! across submissions.

use core::fmt;

use crate::error::{Result, RippleError};

/// Rejection of a proposed value.
///
/// This is an expected, recoverable outcome of the propose phase — distinct
/// from an unexpected delivery failure. A rejecting subscriber is not
/// evicted; the submission as a whole is rolled back instead.
#[derive(Debug, Default)]
pub struct TransactionFailed {
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransactionFailed {
    /// A bare rejection with no underlying cause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A rejection caused by an underlying error.
    pub fn with_cause(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            cause: Some(Box::new(cause)),
        }
    }

    pub(crate) fn from_message(message: String) -> Self {
        Self {
            cause: Some(message.into()),
        }
    }
}

impl fmt::Display for TransactionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "transaction failed: {cause}"),
            None => write!(f, "transaction failed"),
        }
    }
}

impl std::error::Error for TransactionFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| &**cause as &(dyn std::error::Error + 'static))
    }
}

/// Capability object for subscribers taking part in two-phase delivery.
///
/// The owning [`TransactionalProcessor`](crate::TransactionalProcessor)
/// drives the protocol: `begin_transaction` for every subscriber, then
/// either `commit` everywhere or `rollback` everywhere.
pub trait TransactionalSubscriber<V>: Send + Sync {
    /// Stage `value` without making it current.
    ///
    /// Returning an error rejects the submission for every subscriber, not
    /// just this one.
    fn begin_transaction(&self, value: V) -> std::result::Result<(), TransactionFailed>;

    /// Make the staged value current.
    fn commit(&self) -> Result<()>;

    /// Discard any staged value, leaving the current value untouched.
    fn rollback(&self) -> Result<()>;

    /// Called when an error concerns this subscriber.
    ///
    /// The default reports to the tracing sink of last resort and recovers.
    fn on_error(&self, error: &RippleError) -> Result<()> {
        tracing::error!(target: "ripple", %error, "subscriber error went unhandled");
        Ok(())
    }

    /// Called once when the owning processor closes.
    fn on_close(&self) {}

    /// Apply a value directly, outside of processor coordination.
    ///
    /// Stages and immediately commits `value`; on rejection the staged state
    /// is rolled back and the rejection is returned.
    fn accept(&self, value: V) -> Result<()> {
        match self.begin_transaction(value) {
            Ok(()) => self.commit(),
            Err(failed) => {
                self.rollback()?;
                Err(failed.into())
            }
        }
    }
}
