// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test fixtures for the ripple workspace.
//!
//! This crate is for development and testing only, not for production code.
//! It provides observable subscriber fixtures with fault injection and a
//! manually pumped executor so tests can control exactly when scheduled work
//! runs.

pub mod executor;
pub mod recording;
pub mod transactional;

pub use self::executor::ManualExecutor;
pub use self::recording::RecordingSubscriber;
pub use self::transactional::TransactionalRecorder;
