// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Log capture for tests.

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness.
///
/// Honors `RUST_LOG` and falls back to `warn`. Safe to call from every test:
/// only the first call installs a subscriber.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_test_writer()
		.with_thread_names(true)
		.try_init();
}
