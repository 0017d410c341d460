// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::Any;

/// Failures surfaced to callers of an active object.
///
/// Errors only cross threads through result slots, so every variant is
/// `Clone` and owns its payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The stop operation was already enqueued; the submission was rejected.
	#[error("active object is stopped")]
	Stopped,

	/// The operation behind a blocking call panicked on the worker.
	#[error("operation panicked: {0}")]
	OperationPanicked(String),

	/// A result slot was dropped without ever being fulfilled.
	#[error("result slot abandoned before a value was written")]
	Abandoned,

	/// A blocking call was issued from the worker thread itself.
	#[error("blocking call from the worker thread would deadlock")]
	Reentrant,

	/// The worker thread could not be spawned.
	#[error("failed to spawn worker thread: {0}")]
	Spawn(String),

	/// The worker thread terminated by panic.
	#[error("worker thread panicked: {0}")]
	Join(String),
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Unknown panic".to_string()
	}
}
