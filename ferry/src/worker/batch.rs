// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Debug, Formatter};
use parking_lot::MutexGuard;
use super::{Shared, State, Task};

/// A batch of work items queued under one lock acquisition, returned by
/// [`WorkerPool::begin_batch`](super::WorkerPool::begin_batch).
///
/// The work queue stays locked while the batch is alive, so its items are
/// contiguous and in submission order, and the pool can't be stopped in the
/// middle of it. Workers are woken once, when the batch is ended or dropped.
pub struct Batch<'p> {
	state: Option<MutexGuard<'p, State>>,
	shared: &'p Shared,
	threads: usize,
	queued: usize,
}

impl Debug for Batch<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Batch")
			.field("queued", &self.queued)
			.finish_non_exhaustive()
	}
}

impl<'p> Batch<'p> {
	pub(super) fn new(state: MutexGuard<'p, State>, shared: &'p Shared, threads: usize) -> Self {
		Self {
			state: Some(state),
			shared,
			threads,
			queued: 0,
		}
	}

	/// Appends an item to the work queue without waking any worker.
	pub fn queue_work_item(&mut self, item: impl Task) {
		if let Some(state) = &mut self.state {
			state.items.push_back(Box::new(item));
			self.queued += 1;
		}
	}

	/// Returns the number of items queued in this batch.
	pub fn len(&self) -> usize { self.queued }

	/// Returns `true` if no items were queued in this batch.
	pub fn is_empty(&self) -> bool { self.queued == 0 }

	/// Ends the batch, unlocking the queue and waking workers for the queued items.
	/// Equivalent to dropping the batch.
	pub fn end(self) { }
}

impl Drop for Batch<'_> {
	fn drop(&mut self) {
		drop(self.state.take());
		self.shared.wake(self.queued, self.threads);
	}
}
