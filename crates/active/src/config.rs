// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

/// Configuration for an active object's worker thread.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
	/// Name given to the worker OS thread.
	///
	/// Default: "active-object"
	pub name: String,
	/// Stack size of the worker thread. `None` uses the platform default.
	pub stack_size: Option<usize>,
	/// Operations running longer than this are logged at warn level.
	/// `None` disables the check.
	///
	/// Default: 1 second
	pub slow_operation_warning: Option<Duration>,
}

impl Default for WorkerConfig {
	fn default() -> Self {
		Self {
			name: "active-object".to_string(),
			stack_size: None,
			slow_operation_warning: Some(Duration::from_secs(1)),
		}
	}
}

impl WorkerConfig {
	/// Create a new config with default values.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the worker thread name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Set the worker thread stack size in bytes.
	pub fn stack_size(mut self, bytes: usize) -> Self {
		self.stack_size = Some(bytes);
		self
	}

	/// Set or disable the slow operation threshold.
	pub fn slow_operation_warning(mut self, threshold: Option<Duration>) -> Self {
		self.slow_operation_warning = threshold;
		self
	}
}
