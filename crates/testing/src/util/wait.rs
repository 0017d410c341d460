// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Polling helpers for assertions about other threads.
//!
//! A worker thread publishes its progress through shared state. Tests poll
//! that state until it matches instead of sleeping for a guessed duration.

use std::{
	thread::sleep,
	time::{Duration, Instant},
};

/// Upper bound for [`wait_for`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between two checks in [`wait_for`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `condition` every `poll_interval` until it holds.
///
/// The condition is checked once more after the deadline passes, so a state
/// reached during the last pause still counts.
///
/// # Panics
/// When `condition` is still false after `timeout`. The panic message starts
/// with `"Timeout after"` and ends with `timeout_message`.
pub fn wait_for_condition<F>(condition: F, timeout: Duration, poll_interval: Duration, timeout_message: &str)
where
	F: Fn() -> bool,
{
	let deadline = Instant::now() + timeout;
	loop {
		if condition() {
			return;
		}
		if Instant::now() >= deadline {
			break;
		}
		sleep(poll_interval);
	}
	if !condition() {
		panic!("Timeout after {:?}: {}", timeout, timeout_message);
	}
}

/// [`wait_for_condition`] with [`DEFAULT_TIMEOUT`] and [`DEFAULT_POLL_INTERVAL`].
pub fn wait_for<F>(condition: F, message: &str)
where
	F: Fn() -> bool,
{
	wait_for_condition(condition, DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL, message);
}

#[cfg(test)]
pub mod tests {
	use std::{
		sync::{
			Arc,
			atomic::{AtomicBool, AtomicUsize, Ordering},
		},
		thread,
	};

	use super::*;

	#[test]
	fn test_condition_already_true_returns_without_sleeping() {
		let checks = AtomicUsize::new(0);
		wait_for(
			|| {
				checks.fetch_add(1, Ordering::Relaxed);
				true
			},
			"already true",
		);
		assert_eq!(checks.load(Ordering::Relaxed), 1);
	}

	#[test]
	fn test_observes_worker_progress() {
		let processed = Arc::new(AtomicUsize::new(0));
		let done = Arc::new(AtomicBool::new(false));

		let worker = {
			let processed = Arc::clone(&processed);
			let done = Arc::clone(&done);
			thread::spawn(move || {
				for _ in 0..20 {
					thread::sleep(Duration::from_millis(2));
					processed.fetch_add(1, Ordering::Release);
				}
				done.store(true, Ordering::Release);
			})
		};

		wait_for(|| processed.load(Ordering::Acquire) >= 10, "worker should reach ten items");
		wait_for(|| done.load(Ordering::Acquire), "worker should finish");
		assert_eq!(processed.load(Ordering::Acquire), 20);
		worker.join().unwrap();
	}

	#[test]
	fn test_poll_interval_longer_than_timeout() {
		let started = Instant::now();
		wait_for_condition(
			|| started.elapsed() >= Duration::from_millis(20),
			Duration::from_millis(20),
			Duration::from_millis(50),
			"state should be seen after the long pause",
		);
	}

	#[test]
	#[should_panic(expected = "Timeout after 10ms: worker never started")]
	fn test_panics_with_message_after_timeout() {
		wait_for_condition(|| false, Duration::from_millis(10), Duration::from_millis(1), "worker never started");
	}
}
