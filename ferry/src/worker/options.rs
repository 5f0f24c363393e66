// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::thread;
use crate::{Error, Result};

/// Options for tuning [`WorkerPool`](super::WorkerPool).
///
/// # Threads
///
/// The number of worker threads spawned by [`start`](super::WorkerPool::start).
/// Must be greater than zero. Defaults to the available parallelism reported by
/// the OS, or `1` if it can't be determined.
///
/// # Name
///
/// The prefix of worker thread names; each worker is named `{name}-{index}`.
/// Defaults to `ferry-worker`.
///
/// # Stack size
///
/// The stack size of each worker thread, in bytes. Defaults to the platform
/// default for spawned threads.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WorkerOptions {
	pub threads: usize,
	pub name: Cow<'static, str>,
	pub stack_size: Option<usize>,
}

impl Default for WorkerOptions {
	fn default() -> Self { Self::new() }
}

impl WorkerOptions {
	/// Creates a new set of worker options.
	pub fn new() -> Self {
		Self {
			threads: thread::available_parallelism().map_or(1, NonZeroUsize::get),
			name: Cow::Borrowed("ferry-worker"),
			stack_size: None,
		}
	}

	/// Returns the worker thread count.
	#[inline]
	pub fn threads(&self) -> usize { self.threads }

	/// Returns the worker thread name prefix.
	#[inline]
	pub fn name(&self) -> &str { &self.name }

	/// Returns the worker thread stack size, if set.
	#[inline]
	pub fn stack_size(&self) -> Option<usize> { self.stack_size }

	/// Sets the worker thread count.
	#[inline]
	pub fn with_threads(mut self, value: usize) -> Self {
		self.threads = value;
		self
	}

	/// Sets the worker thread name prefix.
	#[inline]
	pub fn with_name(mut self, value: impl Into<Cow<'static, str>>) -> Self {
		self.name = value.into();
		self
	}

	/// Sets the worker thread stack size.
	#[inline]
	pub fn with_stack_size(mut self, value: usize) -> Self {
		self.stack_size = Some(value);
		self
	}

	pub(crate) fn validate(&self) -> Result {
		if self.threads == 0 {
			Err(Error::ZeroThreads)
		} else {
			Ok(())
		}
	}

	pub(crate) fn thread_builder(&self, index: usize) -> thread::Builder {
		let builder = thread::Builder::new().name(format!("{}-{index}", self.name));
		match self.stack_size {
			Some(size) => builder.stack_size(size),
			None => builder
		}
	}
}

#[cfg(test)]
mod test {
	use super::WorkerOptions;

	#[test]
	fn defaults() {
		let options = WorkerOptions::default();
		assert!(options.threads() >= 1);
		assert_eq!(options.name(), "ferry-worker");
		assert_eq!(options.stack_size(), None);
		assert!(options.validate().is_ok());
	}

	#[test]
	fn zero_threads() {
		let options = WorkerOptions::new().with_threads(0);
		assert!(matches!(options.validate(), Err(crate::Error::ZeroThreads)));
	}
}
