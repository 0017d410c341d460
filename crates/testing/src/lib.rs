// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod tracing;
pub mod util;

pub use crate::tracing::init_tracing;
pub use util::wait::{wait_for, wait_for_condition};
