// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Transactional change notification for in-process listeners.
//!
//! ripple is a small publish/subscribe core: a [`Processor`] accepts values
//! and forwards each one to every registered [`Subscriber`], with
//! well-defined failure isolation — one broken subscriber is evicted and
//! reported, everyone else keeps receiving values. Closing a processor is a
//! one-way transition that rejects all later subscriptions.
//!
//! The [`TransactionalProcessor`] adds all-or-nothing delivery: every
//! [`TransactionalSubscriber`] is asked to stage a proposed value, and only
//! if all of them accept does the value get committed anywhere. A single
//! rejection rolls everyone back.
//!
//! In many cases it is best to hand consumers only the subscribe side of a
//! processor and keep submission under the owner's control.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use ripple_rx::{FnSubscriber, Processor};
//!
//! let processor = Processor::<String>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! processor.subscribe(Arc::new(FnSubscriber::new(
//!     move |value: String| -> ripple_rx::Result<()> {
//!         sink.lock().unwrap().push(value);
//!         Ok(())
//!     },
//! )));
//!
//! processor.submit("hello".to_string());
//! assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
//! ```

pub use ripple_core::{
    Disposable, Executor, FnSubscriber, InlineExecutor, Job, Lifecycle, NoOpDisposable,
    Processor, Result, RippleError, Subscriber, TransactionFailed, TransactionalProcessor,
    TransactionalSubscriber,
};
pub use ripple_exec::ThreadExecutor;

#[cfg(feature = "runtime-tokio")]
pub use ripple_exec::TokioExecutor;
