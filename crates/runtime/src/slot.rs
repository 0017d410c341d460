// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! One-shot result slot.
//!
//! A slot carries exactly one `Result<T>` from the thread that produces it to
//! the single thread waiting for it. The writer half is consumed by
//! [`SlotWriter::fulfill`]; dropping it unfulfilled wakes the reader with
//! [`Error::Abandoned`]. The reader half is consumed by [`SlotReader::wait`].
//!
//! ```ignore
//! let (writer, reader) = slot::<i32>();
//! thread::spawn(move || writer.fulfill(Ok(999)));
//! assert_eq!(reader.wait()?, 999);
//! ```

use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use strand_type::{Error, Result};

use crate::sync::{Condvar, Mutex};

enum SlotState<T> {
	Empty,
	Ready(Result<T>),
	Taken,
}

struct Shared<T> {
	state: Mutex<SlotState<T>>,
	ready: Condvar,
}

/// Create a connected writer/reader pair.
pub fn slot<T>() -> (SlotWriter<T>, SlotReader<T>) {
	let shared = Arc::new(Shared {
		state: Mutex::new(SlotState::Empty),
		ready: Condvar::new(),
	});
	(
		SlotWriter {
			shared: Some(Arc::clone(&shared)),
		},
		SlotReader {
			shared,
		},
	)
}

/// Producing half of a result slot. Write-once.
pub struct SlotWriter<T> {
	shared: Option<Arc<Shared<T>>>,
}

impl<T> SlotWriter<T> {
	/// Store the outcome and wake the reader.
	pub fn fulfill(mut self, outcome: Result<T>) {
		if let Some(shared) = self.shared.take() {
			Self::publish(&shared, outcome);
		}
	}

	fn publish(shared: &Shared<T>, outcome: Result<T>) {
		let mut state = shared.state.lock();
		if let SlotState::Empty = *state {
			*state = SlotState::Ready(outcome);
			shared.ready.notify_one();
		}
	}
}

impl<T> Drop for SlotWriter<T> {
	fn drop(&mut self) {
		if let Some(shared) = self.shared.take() {
			Self::publish(&shared, Err(Error::Abandoned));
		}
	}
}

/// Consuming half of a result slot. Read-once.
pub struct SlotReader<T> {
	shared: Arc<Shared<T>>,
}

impl<T> SlotReader<T> {
	/// Block until the writer fulfilled the slot or was dropped.
	pub fn wait(self) -> Result<T> {
		let mut state = self.shared.state.lock();
		loop {
			match std::mem::replace(&mut *state, SlotState::Taken) {
				SlotState::Ready(outcome) => return outcome,
				pending => {
					*state = pending;
					self.shared.ready.wait(&mut state);
				}
			}
		}
	}

	/// Block until the slot is ready or `timeout` has elapsed.
	///
	/// Gives the reader back if nothing arrived in time, so the caller can
	/// keep waiting.
	pub fn wait_timeout(self, timeout: Duration) -> std::result::Result<Result<T>, Self> {
		let deadline = Instant::now() + timeout;
		{
			let mut state = self.shared.state.lock();
			loop {
				if let SlotState::Ready(_) = *state {
					if let SlotState::Ready(outcome) = std::mem::replace(&mut *state, SlotState::Taken) {
						return Ok(outcome);
					}
				}
				let now = Instant::now();
				if now >= deadline {
					break;
				}
				if self.shared.ready.wait_for(&mut state, deadline - now).timed_out()
					&& !matches!(*state, SlotState::Ready(_))
				{
					break;
				}
			}
		}
		Err(self)
	}

	/// Whether a value (or an abandonment) is waiting to be read.
	pub fn is_ready(&self) -> bool {
		matches!(*self.shared.state.lock(), SlotState::Ready(_))
	}
}

#[cfg(test)]
pub mod tests {
	use std::{
		thread,
		time::{Duration, Instant},
	};

	use super::*;

	#[test]
	fn test_fulfill_before_wait() {
		let (writer, reader) = slot();
		writer.fulfill(Ok(7));
		assert!(reader.is_ready());
		assert_eq!(reader.wait(), Ok(7));
	}

	#[test]
	fn test_wait_blocks_until_fulfilled() {
		let (writer, reader) = slot();
		let started = Instant::now();

		let producer = thread::spawn(move || {
			thread::sleep(Duration::from_millis(50));
			writer.fulfill(Ok("done"));
		});

		assert_eq!(reader.wait(), Ok("done"));
		assert!(started.elapsed() >= Duration::from_millis(50));
		producer.join().unwrap();
	}

	#[test]
	fn test_error_outcome() {
		let (writer, reader) = slot::<()>();
		writer.fulfill(Err(Error::OperationPanicked("boom".into())));
		assert_eq!(reader.wait(), Err(Error::OperationPanicked("boom".into())));
	}

	#[test]
	fn test_dropped_writer_abandons() {
		let (writer, reader) = slot::<u32>();
		thread::spawn(move || drop(writer)).join().unwrap();
		assert_eq!(reader.wait(), Err(Error::Abandoned));
	}

	#[test]
	fn test_wait_timeout_returns_reader() {
		let (writer, reader) = slot();

		let reader = match reader.wait_timeout(Duration::from_millis(10)) {
			Ok(_) => panic!("slot should still be empty"),
			Err(reader) => reader,
		};
		assert!(!reader.is_ready());

		writer.fulfill(Ok(1u8));
		assert_eq!(reader.wait_timeout(Duration::from_millis(10)).ok(), Some(Ok(1)));
	}

	#[test]
	fn test_wait_timeout_survives_spurious_wakeups() {
		let (_writer, reader) = slot::<u8>();
		let shared = Arc::clone(&reader.shared);

		let waker = thread::spawn(move || {
			for _ in 0..10 {
				thread::sleep(Duration::from_millis(5));
				let _state = shared.state.lock();
				shared.ready.notify_all();
			}
		});

		let started = Instant::now();
		assert!(reader.wait_timeout(Duration::from_millis(100)).is_err());
		assert!(started.elapsed() >= Duration::from_millis(100));
		waker.join().unwrap();
	}

	#[test]
	fn test_wait_timeout_receives_late_value() {
		let (writer, reader) = slot();

		let producer = thread::spawn(move || {
			thread::sleep(Duration::from_millis(30));
			writer.fulfill(Ok("late"));
		});

		assert_eq!(reader.wait_timeout(Duration::from_secs(5)).ok(), Some(Ok("late")));
		producer.join().unwrap();
	}
}
