// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Building blocks for single-owner execution.
//!
//! - [`DispatchQueue`]: blocking FIFO hand-off from many producers to one consumer
//! - [`Operation`]: a deferred `FnOnce` with owned or scoped captures
//! - [`slot`]: one-shot result cell from the executing thread back to a waiting caller
//! - [`sync`]: the mutex and condition variable underneath both

pub mod operation;
pub mod queue;
pub mod slot;
pub mod sync;

pub use operation::Operation;
pub use queue::DispatchQueue;
pub use slot::{SlotReader, SlotWriter, slot};
pub use strand_type::{Error, Result};
