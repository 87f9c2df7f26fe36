// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Insertion-ordered registration storage with snapshot iteration.

use std::sync::Arc;

use parking_lot::RwLock;

/// Anything stored in a [`Registry`].
pub(crate) trait Registered: Send + Sync {
    fn id(&self) -> u64;
}

/// Registration storage shared between a processor and its disposal handles.
///
/// Iteration always works on a snapshot: concurrent insertions and removals
/// never corrupt an in-flight delivery loop, and every phase of one
/// transactional submission observes the set as it was when the snapshot was
/// taken. Insertion order is preserved, which is what gives the transactional
/// propose phase its registration order.
pub(crate) struct Registry<R> {
    entries: RwLock<Vec<Arc<R>>>,
}

impl<R: Registered> Registry<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn insert(&self, registration: Arc<R>) {
        self.entries.write().push(registration);
    }

    pub(crate) fn get(&self, id: u64) -> Option<Arc<R>> {
        self.entries.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Remove the registration with `id`, keeping insertion order intact.
    pub(crate) fn remove(&self, id: u64) -> Option<Arc<R>> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|r| r.id() == id)?;
        Some(entries.remove(index))
    }

    /// Clone the current set, in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<R>> {
        self.entries.read().clone()
    }

    /// Take every registration out, in insertion order.
    pub(crate) fn drain(&self) -> Vec<Arc<R>> {
        std::mem::take(&mut *self.entries.write())
    }
}
