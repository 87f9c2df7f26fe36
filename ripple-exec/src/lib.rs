// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Executor implementations for ripple processors.
//!
//! Processors consume the [`Executor`](ripple_core::Executor) capability for
//! close and cleanup work. This crate supplies the off-thread
//! implementations: a dedicated worker thread and, behind the
//! `runtime-tokio` feature, an executor backed by a tokio runtime. Both run
//! jobs in submission order, which is the ordering processors rely on.

#![allow(clippy::multiple_crate_versions)]
pub mod thread;

#[cfg(feature = "runtime-tokio")]
pub mod runtime;

pub use self::thread::ThreadExecutor;

#[cfg(feature = "runtime-tokio")]
pub use self::runtime::TokioExecutor;
