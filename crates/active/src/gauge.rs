// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A single-value active object.
//!
//! `Gauge` owns one `f64` on its worker thread and exercises every calling
//! convention: a blocking call with a return value ([`Gauge::sentinel`]),
//! a fire-and-forget mutation ([`Gauge::set`]), fire-and-forget with bound
//! arguments ([`Gauge::announce`]) and a blocking call with output
//! parameters ([`Gauge::overwrite`]).
//!
//! The current value is also published through a relaxed atomic so
//! [`Gauge::value`] can read it without queueing. That read may be stale:
//! only rely on it after ordering has been established (a join of the
//! submitting thread followed by [`Gauge::flush`], or [`Gauge::stop`]).

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use strand_type::Result;
use tracing::{debug, info};

use crate::{
	config::WorkerConfig,
	object::ActiveObject,
	worker::{WorkerState, WorkerStats},
};

/// Value returned by [`Gauge::sentinel`].
pub const SENTINEL: i32 = 999;

/// Values written by [`Gauge::overwrite`].
pub const OVERWRITE: (i32, i32) = (1234, 5678);

/// Worker-owned state of a gauge.
pub struct GaugeState {
	val: f64,
	published: Arc<AtomicU64>,
}

impl GaugeState {
	fn store(&mut self, value: f64) {
		self.val = value;
		self.published.store(value.to_bits(), Ordering::Relaxed);
	}
}

pub struct Gauge {
	object: ActiveObject<GaugeState>,
	published: Arc<AtomicU64>,
}

impl Gauge {
	/// Start a gauge at `0.0`.
	pub fn start() -> Result<Self> {
		Self::with_config(WorkerConfig::new().name("gauge"))
	}

	pub fn with_config(config: WorkerConfig) -> Result<Self> {
		let published = Arc::new(AtomicU64::new(0f64.to_bits()));
		let state = GaugeState {
			val: 0.0,
			published: Arc::clone(&published),
		};
		Ok(Self {
			object: ActiveObject::with_config(state, config)?,
			published,
		})
	}

	/// Blocking call returning a value computed on the worker.
	pub fn sentinel(&self) -> Result<i32> {
		self.object.call(|_| SENTINEL)
	}

	/// Replace the value without waiting.
	pub fn set(&self, value: f64) -> Result<()> {
		self.object.post_mut(move |state| state.store(value))
	}

	/// Log `a` and `b` from the worker without waiting.
	pub fn announce(&self, a: i32, b: i32) -> Result<()> {
		self.object.post(move || info!(a, b, "announce({}, {})", a, b))
	}

	/// Overwrite both output parameters on the worker, blocking until done.
	pub fn overwrite(&self, a: &mut i32, b: &mut i32) -> Result<()> {
		self.object.call_scoped(move |_| {
			debug!(a = *a, b = *b, "overwrite");
			(*a, *b) = OVERWRITE;
		})
	}

	/// Consistent read of the value, queued behind earlier operations.
	pub fn read(&self) -> Result<f64> {
		self.object.call(|state| state.val)
	}

	/// Unqueued, relaxed read of the last published value.
	pub fn value(&self) -> f64 {
		f64::from_bits(self.published.load(Ordering::Relaxed))
	}

	pub fn flush(&self) -> Result<()> {
		self.object.flush()
	}

	pub fn state(&self) -> WorkerState {
		self.object.state()
	}

	pub fn stats(&self) -> WorkerStats {
		self.object.stats()
	}

	pub fn stop(&mut self) -> Result<()> {
		self.object.stop()
	}
}

#[cfg(test)]
pub mod tests {
	use std::thread;

	use super::*;

	#[test]
	fn test_sentinel() {
		let gauge = Gauge::start().unwrap();
		assert_eq!(gauge.sentinel().unwrap(), 999);
	}

	#[test]
	fn test_set_then_read() {
		let gauge = Gauge::start().unwrap();
		gauge.set(2.0).unwrap();
		assert_eq!(gauge.read().unwrap(), 2.0);
		assert_eq!(gauge.value(), 2.0);
	}

	#[test]
	fn test_overwrite() {
		let gauge = Gauge::start().unwrap();
		let (mut a, mut b) = (1, 2);
		gauge.overwrite(&mut a, &mut b).unwrap();
		assert!(a == 1234 && b == 5678);
	}

	#[test]
	fn test_value_after_stop() {
		let mut gauge = Gauge::start().unwrap();
		thread::scope(|s| {
			s.spawn(|| gauge.set(3.5).unwrap());
		});
		gauge.stop().unwrap();
		assert_eq!(gauge.value(), 3.5);
	}

	#[test]
	fn test_announce_is_counted() {
		let mut gauge = Gauge::start().unwrap();
		gauge.announce(5, 7).unwrap();
		gauge.stop().unwrap();

		let stats = gauge.stats();
		assert_eq!(stats.submitted, 1);
		assert_eq!(stats.executed, 1);
		assert_eq!(stats.panicked, 0);
	}
}
