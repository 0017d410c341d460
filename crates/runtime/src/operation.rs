// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Deferred units of work.
//!
//! An [`Operation`] is a boxed `FnOnce(&mut C)` that is created on a caller
//! thread and invoked exactly once by whichever thread owns the context `C`.
//! With `C = ()` it is a plain zero-argument closure.
//!
//! Two constructors encode how captured data may live:
//!
//! - [`Operation::new`] requires `'static` captures. Use it whenever the
//!   caller does not wait for the operation: values must be moved in, the
//!   caller's stack frame may be gone by the time the operation runs.
//! - [`Operation::scoped`] accepts captures borrowed from the caller. It is
//!   `unsafe` because it is only sound while the caller stays blocked until
//!   the operation has been run or dropped.

use std::{fmt, mem};

type Thunk<'a, C> = Box<dyn FnOnce(&mut C) + Send + 'a>;

pub struct Operation<C = ()> {
	thunk: Thunk<'static, C>,
}

impl<C> Operation<C> {
	/// Wrap a closure that owns everything it captures.
	pub fn new<F>(f: F) -> Self
	where
		F: FnOnce(&mut C) + Send + 'static,
	{
		Self {
			thunk: Box::new(f),
		}
	}

	/// Wrap a closure that borrows caller data for `'a`.
	///
	/// # Safety
	///
	/// The caller must not let `'a` end until the returned operation has
	/// either finished running or been dropped, on whatever thread that
	/// happens. The usual way to uphold this is to capture the writer half
	/// of a result slot *after* every borrow (so it is dropped last) and
	/// block on the reader half before returning.
	pub unsafe fn scoped<'a, F>(f: F) -> Self
	where
		F: FnOnce(&mut C) + Send + 'a,
	{
		let thunk: Thunk<'a, C> = Box::new(f);
		// SAFETY: only the lifetime bound of the trait object changes; the
		// caller guarantees the borrows outlive every use of the thunk.
		let thunk: Thunk<'static, C> = unsafe { mem::transmute::<Thunk<'a, C>, Thunk<'static, C>>(thunk) };
		Self {
			thunk,
		}
	}

	/// Consume and execute the operation.
	#[inline]
	pub fn run(self, ctx: &mut C) {
		(self.thunk)(ctx)
	}
}

impl Operation<()> {
	/// Execute an operation that needs no context.
	#[inline]
	pub fn call(self) {
		self.run(&mut ())
	}
}

impl<C> fmt::Debug for Operation<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Operation").finish_non_exhaustive()
	}
}
