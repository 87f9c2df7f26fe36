// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Manually pumped executor for deterministic scheduling tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use ripple_core::{Executor, Job};

/// Executor that queues jobs until the test pumps them.
///
/// Lets a test observe the state between "scheduled" and "ran" — e.g. the
/// return value of `close_if_unsubscribed` before its check executes.
#[derive(Default)]
pub struct ManualExecutor {
    queue: Mutex<VecDeque<Job>>,
}

impl ManualExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued job; `false` when the queue is empty.
    pub fn run_next(&self) -> bool {
        let job = self.queue.lock().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Drain the queue in order, returning how many jobs ran. Jobs enqueued
    /// by the jobs themselves run too.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Executor for ManualExecutor {
    fn execute(&self, job: Job) {
        self.queue.lock().push_back(job);
    }
}
