// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::{Condvar, Mutex};

/// A cooperative cancellation flag, shared between a [`WorkerPool`] and the
/// work it runs.
///
/// Long-running work captures a clone from [`WorkerPool::cancel_token`] and
/// either polls [`is_cancelled`](Self::is_cancelled) or blocks in
/// [`wait_timeout`](Self::wait_timeout), which returns as soon as the pool is
/// stopped. Cancellation never aborts work; the work decides when to return.
///
/// [`WorkerPool`]: super::WorkerPool
/// [`WorkerPool::cancel_token`]: super::WorkerPool::cancel_token
#[derive(Clone, Default)]
pub struct CancelToken(Arc<Inner>);

#[derive(Default)]
struct Inner {
	cancelled: Mutex<bool>,
	signal: Condvar,
}

impl Debug for CancelToken {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("CancelToken")
			.field(&self.is_cancelled())
			.finish()
	}
}

impl CancelToken {
	/// Creates a new, uncancelled token.
	pub fn new() -> Self { Self::default() }

	/// Cancels the token, waking everything blocked on it. Cancelling twice has no
	/// further effect.
	pub fn cancel(&self) {
		let Self(inner) = self;
		*inner.cancelled.lock() = true;
		inner.signal.notify_all();
	}

	/// Returns `true` if the token was cancelled.
	pub fn is_cancelled(&self) -> bool {
		*self.0.cancelled.lock()
	}

	/// Blocks until the token is cancelled.
	pub fn wait(&self) {
		let Self(inner) = self;
		let mut cancelled = inner.cancelled.lock();
		while !*cancelled {
			inner.signal.wait(&mut cancelled);
		}
	}

	/// Blocks until the token is cancelled or `timeout` elapses, returning `true`
	/// if it was cancelled. Use in place of [`thread::sleep`](std::thread::sleep)
	/// in work that should end promptly on shutdown.
	pub fn wait_timeout(&self, timeout: Duration) -> bool {
		let Some(deadline) = Instant::now().checked_add(timeout) else {
			self.wait();
			return true
		};

		let Self(inner) = self;
		let mut cancelled = inner.cancelled.lock();
		while !*cancelled {
			if inner.signal.wait_until(&mut cancelled, deadline).timed_out() {
				break
			}
		}
		*cancelled
	}
}
