// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Active objects: state owned by one worker thread, mutated only by
//! operations that callers enqueue.
//!
//! - [`ActiveObject`]: owns the worker thread and its lifecycle
//! - [`Handle`]: cloneable submission side, usable from any thread
//! - [`Gauge`]: a small active object holding one `f64`
//! - [`WorkerConfig`]: worker thread settings

pub mod config;
pub mod gauge;
pub mod object;
pub mod worker;

pub use config::WorkerConfig;
pub use gauge::Gauge;
pub use object::{ActiveObject, Handle};
pub use strand_type::{Error, Result};
pub use worker::{WorkerState, WorkerStats};
