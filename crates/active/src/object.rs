// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Active object: state owned by one worker thread, driven by queued operations.
//!
//! Calling conventions:
//! - [`Handle::post`]: fire-and-forget, no state access
//! - [`Handle::post_mut`]: fire-and-forget, mutates the state
//! - [`Handle::call`]: blocks until the operation ran, returns its value
//! - [`Handle::call_scoped`]: like `call`, but the operation may borrow
//!   caller data (output parameters)
//!
//! All of them enqueue on the same FIFO, so operations run in submission
//! order. Blocking calls establish a happens-before edge from the worker back
//! to the caller; fire-and-forget mutations are only guaranteed visible after
//! a later blocking call.
//!
//! # Example
//!
//! ```ignore
//! let mut counter = ActiveObject::start(0u64)?;
//! counter.post_mut(|n| *n += 1)?;
//! assert_eq!(counter.call(|n| *n)?, 1);
//! counter.stop()?;
//! ```

use std::{
	panic::{AssertUnwindSafe, catch_unwind, resume_unwind},
	sync::{Arc, atomic::Ordering},
	thread::{self, JoinHandle, ThreadId},
};

use strand_runtime::{DispatchQueue, Operation, SlotWriter, slot};
use strand_type::{Error, Result, panic_message};
use tracing::{debug, warn};

use crate::{
	config::WorkerConfig,
	worker::{self, Owner, Task, WorkerShared, WorkerState, WorkerStats},
};

/// Cloneable submission side of an active object.
///
/// A handle can be sent to any thread. It does not own the worker thread;
/// once the owning [`ActiveObject`] stopped, every submission fails with
/// [`Error::Stopped`].
pub struct Handle<S> {
	queue: Arc<DispatchQueue<Task<S>>>,
	shared: Arc<WorkerShared>,
	worker: ThreadId,
}

impl<S> Clone for Handle<S> {
	fn clone(&self) -> Self {
		Self {
			queue: Arc::clone(&self.queue),
			shared: Arc::clone(&self.shared),
			worker: self.worker,
		}
	}
}

impl<S: Send + 'static> Handle<S> {
	/// Enqueue `f` to run on the worker and return immediately.
	///
	/// Arguments must be moved into the closure.
	pub fn post<F>(&self, f: F) -> Result<()>
	where
		F: FnOnce() + Send + 'static,
	{
		self.submit(Operation::new(move |_: &mut Owner<S>| f()))
	}

	/// Enqueue a state mutation and return immediately.
	pub fn post_mut<F>(&self, f: F) -> Result<()>
	where
		F: FnOnce(&mut S) + Send + 'static,
	{
		self.submit(Operation::new(move |owner: &mut Owner<S>| f(&mut owner.state)))
	}

	/// Run `f` on the worker and block until it returns.
	///
	/// A panic inside `f` is reported as [`Error::OperationPanicked`]; the
	/// worker keeps running.
	pub fn call<R, F>(&self, f: F) -> Result<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		self.ensure_not_worker()?;
		let (writer, reader) = slot();
		let request = Request {
			f,
			writer,
		};
		self.submit(Operation::new(move |owner: &mut Owner<S>| request.run(&mut owner.state)))?;
		reader.wait()
	}

	/// Run `f` on the worker and block until it returns, letting `f` borrow
	/// from the caller.
	///
	/// ```ignore
	/// let (mut a, mut b) = (1, 2);
	/// handle.call_scoped(|_| { a = 1234; b = 5678; })?;
	/// assert_eq!((a, b), (1234, 5678));
	/// ```
	pub fn call_scoped<'a, R, F>(&self, f: F) -> Result<R>
	where
		R: Send + 'a,
		F: FnOnce(&mut S) -> R + Send + 'a,
	{
		self.ensure_not_worker()?;
		let (writer, reader) = slot();
		let request = Request {
			f,
			writer,
		};
		// SAFETY: this frame blocks on `reader` until the writer inside
		// `request` is consumed or dropped. `Request` drops `f` before
		// `writer`, and `run` consumes `f` before fulfilling, so no borrow
		// held by `f` is touched after the reader wakes. If the queue
		// rejects the operation it is dropped inside `submit`, before the
		// early return.
		let op = unsafe { Operation::scoped(move |owner: &mut Owner<S>| request.run(&mut owner.state)) };
		self.submit(op)?;
		reader.wait()
	}

	/// Block until every operation submitted before this call has run.
	pub fn flush(&self) -> Result<()> {
		self.call(|_| ())
	}

	pub fn state(&self) -> WorkerState {
		self.shared.state()
	}

	pub fn stats(&self) -> WorkerStats {
		self.shared.stats()
	}

	fn submit(&self, op: Task<S>) -> Result<()> {
		// submitted >= executed in every snapshot
		self.shared.submitted.fetch_add(1, Ordering::Relaxed);
		self.queue.put(op).inspect_err(|_| {
			self.shared.submitted.fetch_sub(1, Ordering::Relaxed);
		})
	}

	fn ensure_not_worker(&self) -> Result<()> {
		if thread::current().id() == self.worker {
			return Err(Error::Reentrant);
		}
		Ok(())
	}
}

/// A blocking request: the work plus the slot its outcome goes to.
///
/// Field order matters: `f` is dropped before `writer`.
struct Request<F, R> {
	f: F,
	writer: SlotWriter<R>,
}

impl<F, R> Request<F, R> {
	fn run<S>(self, state: &mut S)
	where
		F: FnOnce(&mut S) -> R,
	{
		let Request {
			f,
			writer,
		} = self;
		match catch_unwind(AssertUnwindSafe(move || f(state))) {
			Ok(value) => writer.fulfill(Ok(value)),
			Err(payload) => {
				writer.fulfill(Err(Error::OperationPanicked(panic_message(payload.as_ref()))));
				// let the worker loop count and log it
				resume_unwind(payload);
			}
		}
	}
}

/// An object whose state lives on a dedicated worker thread.
///
/// Created with [`start`](Self::start), which spawns the worker. The creator
/// is responsible for [`stop`](Self::stop); dropping the object stops it too.
pub struct ActiveObject<S: Send + 'static> {
	handle: Handle<S>,
	name: String,
	join_handle: Option<JoinHandle<()>>,
}

impl<S: Send + 'static> ActiveObject<S> {
	/// Start a worker with the default configuration.
	pub fn start(state: S) -> Result<Self> {
		Self::with_config(state, WorkerConfig::default())
	}

	/// Start a worker, moving `state` onto it.
	pub fn with_config(state: S, config: WorkerConfig) -> Result<Self> {
		let queue = Arc::new(DispatchQueue::new());
		let shared = Arc::new(WorkerShared::default());
		let join_handle = worker::spawn(state, Arc::clone(&queue), Arc::clone(&shared), &config)?;

		Ok(Self {
			handle: Handle {
				queue,
				shared,
				worker: join_handle.thread().id(),
			},
			name: config.name,
			join_handle: Some(join_handle),
		})
	}

	/// Get a cloneable handle for submitting from other threads.
	pub fn handle(&self) -> Handle<S> {
		self.handle.clone()
	}

	pub fn post<F>(&self, f: F) -> Result<()>
	where
		F: FnOnce() + Send + 'static,
	{
		self.handle.post(f)
	}

	pub fn post_mut<F>(&self, f: F) -> Result<()>
	where
		F: FnOnce(&mut S) + Send + 'static,
	{
		self.handle.post_mut(f)
	}

	pub fn call<R, F>(&self, f: F) -> Result<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		self.handle.call(f)
	}

	pub fn call_scoped<'a, R, F>(&self, f: F) -> Result<R>
	where
		R: Send + 'a,
		F: FnOnce(&mut S) -> R + Send + 'a,
	{
		self.handle.call_scoped(f)
	}

	pub fn flush(&self) -> Result<()> {
		self.handle.flush()
	}

	pub fn state(&self) -> WorkerState {
		self.handle.state()
	}

	pub fn stats(&self) -> WorkerStats {
		self.handle.stats()
	}

	/// Enqueue the stop operation and wait for the worker to finish.
	///
	/// Everything submitted before runs first; submissions after it are
	/// rejected. Calling `stop` again is a no-op.
	///
	/// Called from one of the object's own operations (for instance by
	/// dropping the object there), the stop operation is still enqueued but
	/// the worker is detached instead of joined; it exits once the current
	/// operation returns.
	pub fn stop(&mut self) -> Result<()> {
		let Some(join_handle) = self.join_handle.take() else {
			return Ok(());
		};

		if self.handle.queue.close_with(worker::stop_task()).is_err() {
			debug!(worker = %self.name, "Dispatch queue already closed");
		}

		// stopped from inside one of its own operations: the worker exits
		// after the current operation, it cannot join itself
		if self.handle.ensure_not_worker().is_err() {
			debug!(worker = %self.name, "Stop requested on the worker thread, detaching");
			return Ok(());
		}

		join_handle.join().map_err(|payload| Error::Join(panic_message(payload.as_ref())))
	}
}

impl<S: Send + 'static> Drop for ActiveObject<S> {
	fn drop(&mut self) {
		if let Err(e) = self.stop() {
			warn!(worker = %self.name, "Failed to stop active object: {}", e);
		}
	}
}
