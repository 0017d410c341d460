// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Blocking FIFO hand-off between producer threads and a consumer.
//!
//! The queue is unbounded: `put` only holds the lock long enough to push.
//! `take` parks the consumer on a condition variable while the queue is
//! empty and re-checks emptiness after every wake-up.
//!
//! A queue can be closed once. Closing is atomic with enqueuing a final
//! item (`close_with`), so nothing can slip in behind that item. After
//! closing, `put` fails with [`Error::Stopped`] and `take` returns `None`
//! once the remaining items are drained.

use std::{
	collections::VecDeque,
	time::{Duration, Instant},
};

use strand_type::{Error, Result};

use crate::sync::{Condvar, Mutex};

struct Inner<T> {
	items: VecDeque<T>,
	closed: bool,
}

/// Thread-safe, unbounded, closable FIFO queue.
pub struct DispatchQueue<T> {
	inner: Mutex<Inner<T>>,
	not_empty: Condvar,
}

impl<T> DispatchQueue<T> {
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(Inner {
				items: VecDeque::new(),
				closed: false,
			}),
			not_empty: Condvar::new(),
		}
	}

	/// Enqueue `item` at the tail and wake one waiting consumer.
	pub fn put(&self, item: T) -> Result<()> {
		let mut inner = self.inner.lock();
		if inner.closed {
			return Err(Error::Stopped);
		}
		inner.items.push_back(item);
		self.not_empty.notify_one();
		Ok(())
	}

	/// Enqueue a final `item` and close the queue in one step.
	pub fn close_with(&self, item: T) -> Result<()> {
		let mut inner = self.inner.lock();
		if inner.closed {
			return Err(Error::Stopped);
		}
		inner.items.push_back(item);
		inner.closed = true;
		self.not_empty.notify_all();
		Ok(())
	}

	/// Close the queue, handing back everything that was still queued.
	pub fn close(&self) -> Vec<T> {
		let mut inner = self.inner.lock();
		inner.closed = true;
		self.not_empty.notify_all();
		inner.items.drain(..).collect()
	}

	/// Block until an item is available and remove the head.
	///
	/// Returns `None` only when the queue is closed and empty.
	pub fn take(&self) -> Option<T> {
		let mut inner = self.inner.lock();
		loop {
			if let Some(item) = inner.items.pop_front() {
				return Some(item);
			}
			if inner.closed {
				return None;
			}
			self.not_empty.wait(&mut inner);
		}
	}

	/// Like [`take`](Self::take), but gives up after `timeout`.
	pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
		let deadline = Instant::now() + timeout;
		let mut inner = self.inner.lock();
		loop {
			if let Some(item) = inner.items.pop_front() {
				return Some(item);
			}
			if inner.closed {
				return None;
			}
			let now = Instant::now();
			if now >= deadline {
				return None;
			}
			if self.not_empty.wait_for(&mut inner, deadline - now).timed_out() {
				return inner.items.pop_front();
			}
		}
	}

	/// Remove the head without blocking.
	pub fn try_take(&self) -> Option<T> {
		self.inner.lock().items.pop_front()
	}

	pub fn len(&self) -> usize {
		self.inner.lock().items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.lock().items.is_empty()
	}

	pub fn is_closed(&self) -> bool {
		self.inner.lock().closed
	}

	/// Wake every waiting consumer without enqueuing anything.
	#[cfg(test)]
	fn wake_spuriously(&self) {
		let _inner = self.inner.lock();
		self.not_empty.notify_all();
	}
}

impl<T> Default for DispatchQueue<T> {
	fn default() -> Self {
		Self::new()
	}
}
