// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::thread;

use strand_active::{Gauge, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn setup_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_thread_names(true)
		.try_init();
}

fn main() -> Result<()> {
	setup_logging();

	let mut gauge = Gauge::start()?;

	let sentinel = gauge.sentinel()?;
	assert_eq!(sentinel, 999);
	info!(sentinel, "blocking call returned");

	let (a, b) = thread::scope(|s| -> Result<(i32, i32)> {
		// mix things up by mutating from another thread
		let mutator = s.spawn(|| gauge.set(2.0));

		gauge.announce(5, 7)?;

		let (mut a, mut b) = (1, 2);
		gauge.overwrite(&mut a, &mut b)?;

		match mutator.join() {
			Ok(outcome) => outcome?,
			Err(payload) => std::panic::resume_unwind(payload),
		}
		Ok((a, b))
	})?;
	assert!(a == 1234 && b == 5678);
	info!(a, b, "output parameters written");

	gauge.flush()?;
	assert_eq!(gauge.value(), 2.0);
	info!(value = gauge.value(), "gauge value");

	gauge.stop()?;
	let stats = gauge.stats();
	info!(submitted = stats.submitted, executed = stats.executed, "gauge stopped");
	Ok(())
}
