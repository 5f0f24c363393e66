// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

pub type Result<T = ()> = result::Result<T, Error>;

/// An error raised while configuring or driving a pool.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("chunk size must be greater than zero")]
	ZeroChunkSize,
	#[error("worker thread count must be greater than zero")]
	ZeroThreads,
	#[error("the worker pool is already running")]
	AlreadyRunning,
	/// The worker pool is stopped, stopping, or was never started.
	#[error("the worker pool is not accepting work")]
	Stopped,
	#[error("failed to spawn worker thread {index}")]
	Spawn {
		index: usize,
		#[source]
		source: io::Error,
	},
}

impl Error {
	/// Returns `true` if the error was caused by a pool that isn't accepting work.
	pub fn is_stopped(&self) -> bool {
		matches!(self, Self::Stopped)
	}
}

/// The reason a submitted task didn't produce a value.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TaskError {
	/// The task was dropped without running, because the pool shut down first.
	#[error("the task was cancelled before it ran")]
	Cancelled,
	/// The task panicked while running.
	#[error("the task panicked: {0}")]
	Panicked(String),
}
