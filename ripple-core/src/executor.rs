// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The scheduling capability consumed by processors.

/// A unit of work handed to an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget scheduling capability.
///
/// Processors route close and cleanup work through their executor. The core
/// assumes only that submitted work eventually runs, and that work submitted
/// by one submitter runs in submission order on that executor. There is no
/// completion signal back to the caller.
pub trait Executor: Send + Sync {
    /// Schedule `job`.
    fn execute(&self, job: Job);
}

/// Executor running every job on the calling thread, before `execute`
/// returns.
///
/// This is the default for processors created without an explicit executor;
/// close and cleanup then happen synchronously, which keeps single-threaded
/// usage deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}
