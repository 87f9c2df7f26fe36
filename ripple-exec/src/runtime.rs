// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tokio-backed executor.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};

use ripple_core::{Executor, Job};

/// Executor draining jobs on a tokio runtime, one at a time, in order.
///
/// A single forwarding task owns the queue, so jobs keep the FIFO ordering
/// processors rely on (bare `spawn_blocking` would not). Jobs run on a
/// runtime worker thread and are expected to be short dispatch work.
///
/// When the runtime shuts down, the drain task goes with it and later jobs
/// are dropped with a warning.
pub struct TokioExecutor {
    sender: UnboundedSender<Job>,
}

impl TokioExecutor {
    /// Executor on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like
    /// [`Handle::current`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_handle(&Handle::current())
    }

    /// Executor on the runtime behind `handle`.
    #[must_use]
    pub fn with_handle(handle: &Handle) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        handle.spawn(async move {
            while let Some(job) = receiver.recv().await {
                if catch_unwind(AssertUnwindSafe(|| job())).is_err() {
                    tracing::error!(target: "ripple", "executor job panicked");
                }
            }
        });
        Self { sender }
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        if self.sender.send(job).is_err() {
            tracing::warn!(target: "ripple", "executor runtime is gone; job dropped");
        }
    }
}
