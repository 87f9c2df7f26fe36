// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core capabilities and processors for the ripple notification library.
//!
//! A [`Processor`] fans submitted values out to every subscribed
//! [`Subscriber`], evicting subscribers whose callbacks fail without
//! disturbing the rest. A [`TransactionalProcessor`] adds all-or-nothing
//! delivery: a value becomes current for every subscriber or for none.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod disposable;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod processor;
pub mod subscriber;
pub mod transaction;
pub mod transactional;

mod registration;
mod registry;

pub use self::disposable::{Disposable, NoOpDisposable};
pub use self::error::{Result, RippleError};
pub use self::executor::{Executor, InlineExecutor, Job};
pub use self::lifecycle::Lifecycle;
pub use self::processor::Processor;
pub use self::subscriber::{FnSubscriber, Subscriber};
pub use self::transaction::{TransactionFailed, TransactionalSubscriber};
pub use self::transactional::TransactionalProcessor;
