// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared error and result types for the strand crates.

pub mod error;

pub use error::{Error, panic_message};

pub type Result<T> = std::result::Result<T, Error>;
