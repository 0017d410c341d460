// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Worker thread that owns the state and drains the dispatch queue.
//!
//! The worker is the only thread that ever runs an operation, so operations
//! touch the owner state without any locking. The loop:
//! 1. `take()` the next operation (parks while the queue is empty)
//! 2. run it under `catch_unwind`
//! 3. stop once the shutdown flag was set by the stop operation

use std::{
	panic::{AssertUnwindSafe, catch_unwind},
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	thread::{self, JoinHandle},
	time::{Duration, Instant},
};

use strand_runtime::{DispatchQueue, Operation};
use strand_type::{Error, Result, panic_message};
use tracing::{debug, error, trace, warn};

use crate::config::WorkerConfig;

/// Execution context handed to every operation on the worker.
pub(crate) struct Owner<S> {
	pub(crate) state: S,
	pub(crate) shutdown: bool,
}

/// Operation queued for an active object with state `S`.
pub(crate) type Task<S> = Operation<Owner<S>>;

/// The operation that ends the run loop.
pub(crate) fn stop_task<S: 'static>() -> Task<S> {
	Operation::new(|owner: &mut Owner<S>| owner.shutdown = true)
}

/// Lifecycle of the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
	/// Taking and executing operations.
	Running,
	/// The stop operation ran; nothing executes anymore.
	Stopped,
}

/// Snapshot of a worker's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
	/// Operations accepted by the queue.
	pub submitted: u64,
	/// Operations the worker finished, including the ones that panicked.
	pub executed: u64,
	/// Operations that panicked.
	pub panicked: u64,
}

/// Counters and lifecycle flag shared between the worker and its handles.
#[derive(Debug, Default)]
pub(crate) struct WorkerShared {
	pub(crate) submitted: AtomicU64,
	executed: AtomicU64,
	panicked: AtomicU64,
	stopped: AtomicBool,
}

impl WorkerShared {
	pub(crate) fn stats(&self) -> WorkerStats {
		WorkerStats {
			submitted: self.submitted.load(Ordering::Relaxed),
			executed: self.executed.load(Ordering::Relaxed),
			panicked: self.panicked.load(Ordering::Relaxed),
		}
	}

	pub(crate) fn state(&self) -> WorkerState {
		if self.stopped.load(Ordering::Acquire) {
			WorkerState::Stopped
		} else {
			WorkerState::Running
		}
	}
}

/// Spawn the worker thread, moving `state` onto it.
pub(crate) fn spawn<S: Send + 'static>(
	state: S,
	queue: Arc<DispatchQueue<Task<S>>>,
	shared: Arc<WorkerShared>,
	config: &WorkerConfig,
) -> Result<JoinHandle<()>> {
	let name = config.name.clone();
	let slow = config.slow_operation_warning;

	let mut builder = thread::Builder::new().name(name.clone());
	if let Some(bytes) = config.stack_size {
		builder = builder.stack_size(bytes);
	}

	builder.spawn(move || {
		debug!(worker = %name, "Active object worker started");
		let mut owner = Owner {
			state,
			shutdown: false,
		};
		run_loop(&name, &mut owner, &queue, &shared, slow);
		shared.stopped.store(true, Ordering::Release);
		debug!(worker = %name, "Active object worker stopped");
	})
	.map_err(|e| Error::Spawn(e.to_string()))
}

fn run_loop<S>(
	name: &str,
	owner: &mut Owner<S>,
	queue: &DispatchQueue<Task<S>>,
	shared: &WorkerShared,
	slow: Option<Duration>,
) {
	while !owner.shutdown {
		let Some(task) = queue.take() else {
			debug!(worker = %name, "Dispatch queue closed, stopping");
			break;
		};

		let started = Instant::now();
		let outcome = catch_unwind(AssertUnwindSafe(|| task.run(owner)));
		let elapsed = started.elapsed();

		if owner.shutdown {
			trace!(worker = %name, "Stop operation executed");
			break;
		}

		shared.executed.fetch_add(1, Ordering::Relaxed);

		if let Err(payload) = outcome {
			shared.panicked.fetch_add(1, Ordering::Relaxed);
			error!(worker = %name, "Operation panicked: {}", panic_message(payload.as_ref()));
		}

		match slow {
			Some(limit) if elapsed > limit => {
				warn!(worker = %name, elapsed_ms = elapsed.as_millis() as u64, "Slow operation");
			}
			_ => trace!(worker = %name, elapsed_us = elapsed.as_micros() as u64, "Operation executed"),
		}
	}
}
