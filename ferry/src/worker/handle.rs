// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use flume::{Receiver, RecvTimeoutError, Sender};
use crate::TaskError;

pub(super) type TaskResult<T> = Result<T, TaskError>;

/// A handle to the result of work submitted with
/// [`WorkerPool::submit`](super::WorkerPool::submit).
///
/// If the pool shuts down before the work runs, the work is dropped and the
/// handle resolves to [`TaskError::Cancelled`].
#[must_use = "dropping a handle discards the task's result"]
pub struct TaskHandle<T>(Receiver<TaskResult<T>>);

impl<T> Debug for TaskHandle<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TaskHandle")
			.field("is_finished", &self.is_finished())
			.finish()
	}
}

impl<T> TaskHandle<T> {
	pub(super) fn new() -> (Self, Sender<TaskResult<T>>) {
		let (sender, receiver) = flume::bounded(1);
		(Self(receiver), sender)
	}

	/// Returns `true` if the task has finished, or was dropped without running.
	pub fn is_finished(&self) -> bool {
		let Self(receiver) = self;
		!receiver.is_empty() || receiver.is_disconnected()
	}

	/// Blocks until the task finishes, returning its result.
	pub fn join(self) -> TaskResult<T> {
		let Self(receiver) = self;
		receiver.recv().unwrap_or(Err(TaskError::Cancelled))
	}

	/// Blocks until the task finishes or `timeout` elapses. On timeout, the handle
	/// is given back to wait again later.
	pub fn join_timeout(self, timeout: Duration) -> Result<TaskResult<T>, Self> {
		match self.0.recv_timeout(timeout) {
			Ok(result) => Ok(result),
			Err(RecvTimeoutError::Disconnected) => Ok(Err(TaskError::Cancelled)),
			Err(RecvTimeoutError::Timeout) => Err(self),
		}
	}

	/// Waits for the task to finish without blocking the current thread.
	pub async fn join_async(self) -> TaskResult<T> {
		let Self(receiver) = self;
		receiver.into_recv_async()
				.await
				.unwrap_or(Err(TaskError::Cancelled))
	}
}
