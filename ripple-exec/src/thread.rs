// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dedicated-thread executor.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use parking_lot::Mutex;

use ripple_core::{Executor, Job};

/// Executor owning one worker thread that runs jobs in submission order.
///
/// Jobs queue on an unbounded channel and drain FIFO. A panicking job is
/// caught and reported; the worker keeps draining. Dropping the executor
/// disconnects the queue and joins the worker, so work already submitted
/// still runs before `drop` returns.
pub struct ThreadExecutor {
    sender: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadExecutor {
    /// Spawn the worker thread.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker = std::thread::spawn(move || {
            while let Ok(job) = receiver.recv() {
                if catch_unwind(AssertUnwindSafe(|| job())).is_err() {
                    tracing::error!(target: "ripple", "executor job panicked");
                }
            }
        });
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        match self.sender.lock().as_ref() {
            Some(sender) => {
                if sender.send(job).is_err() {
                    tracing::warn!(target: "ripple", "executor worker is gone; job dropped");
                }
            }
            None => tracing::warn!(target: "ripple", "executor already shut down; job dropped"),
        }
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        // Disconnect first so the worker drains the queue and exits.
        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                tracing::error!(target: "ripple", "executor worker terminated by panic");
            }
        }
    }
}
