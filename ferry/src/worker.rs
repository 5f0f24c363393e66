// SPDX-License-Identifier: Apache-2.0

mod batch;
mod cancel;
mod handle;
mod options;
mod task;

pub use batch::Batch;
pub use cancel::CancelToken;
pub use handle::TaskHandle;
pub use options::*;
pub use task::Task;

use std::collections::VecDeque;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::mem;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;
use parking_lot::{Condvar, Mutex};
use crate::{Error, Result, TaskError};
use task::{BoxedTask, execute, panic_message};

/// A fixed-size set of threads executing work items from a shared FIFO queue.
///
/// Work is queued with [`queue_work_item`](Self::queue_work_item), in batches
/// with [`begin_batch`](Self::begin_batch), or with [`submit`](Self::submit) to
/// retrieve its result. Shutdown is two-phase: [`stop`](Self::stop) refuses new
/// work, wakes idle workers and cancels the pool's [`CancelToken`];
/// [`wait`](Self::wait) joins the threads and drops any items left unstarted. An
/// item a worker has already popped always runs to completion.
///
/// All methods take `&self`; share the pool between producers with an [`Arc`].
/// Dropping the pool stops and joins it.
pub struct WorkerPool {
	shared: Arc<Shared>,
	threads: Mutex<Vec<JoinHandle<()>>>,
	options: WorkerOptions,
}

pub(crate) struct Shared {
	state: Mutex<State>,
	available: Condvar,
}

pub(crate) struct State {
	items: VecDeque<BoxedTask>,
	status: Status,
	cancel: CancelToken,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Status {
	/// Not started, or stopped and joined.
	Stopped,
	Running,
	/// Stopped, but not yet joined.
	Stopping,
}

impl Debug for WorkerPool {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let state = self.shared.state.lock();
		f.debug_struct("WorkerPool")
			.field("status", &state.status)
			.field("queued", &state.items.len())
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl WorkerPool {
	/// Creates a new pool with `threads` worker threads. The pool doesn't run until
	/// [`start`](Self::start) is called.
	pub fn new(threads: usize) -> Result<Self> {
		Self::with_options(WorkerOptions::new().with_threads(threads))
	}

	/// Creates a new pool from `options`.
	pub fn with_options(options: WorkerOptions) -> Result<Self> {
		options.validate()?;
		Ok(Self {
			shared: Arc::new(Shared {
				state: Mutex::new(State {
					items: VecDeque::new(),
					status: Status::Stopped,
					cancel: CancelToken::new(),
				}),
				available: Condvar::new(),
			}),
			threads: Mutex::default(),
			options,
		})
	}

	/// Spawns the worker threads. A pool that was stopped and joined can be started
	/// again, with a fresh [`CancelToken`].
	///
	/// # Errors
	///
	/// Returns [`Error::AlreadyRunning`] if the pool is running or hasn't been
	/// joined since it was stopped, and [`Error::Spawn`] if a thread couldn't be
	/// spawned. In the latter case any threads already spawned are stopped and
	/// joined before returning; the pool never partially starts.
	pub fn start(&self) -> Result {
		let mut threads = self.threads.lock();
		{
			let mut state = self.shared.state.lock();
			if state.status != Status::Stopped || !threads.is_empty() {
				return Err(Error::AlreadyRunning)
			}

			state.status = Status::Running;
			state.cancel = CancelToken::new();
		}

		threads.reserve(self.options.threads);
		for index in 0..self.options.threads {
			let shared = self.shared.clone();
			let spawned = self.options
							  .thread_builder(index)
							  .spawn(move || run(&shared, index));
			match spawned {
				Ok(handle) => threads.push(handle),
				Err(source) => {
					tracing::error!(index, error = %source, "failed to spawn worker thread");
					self.stop();
					self.join(&mut threads);
					return Err(Error::Spawn { index, source })
				}
			}
		}

		tracing::debug!(threads = self.options.threads, name = %self.options.name, "worker pool started");
		Ok(())
	}

	/// Appends `item` to the work queue and wakes one idle worker. Returns `false`,
	/// dropping the item, if the pool isn't running.
	pub fn queue_work_item(&self, item: impl Task) -> bool {
		let item: BoxedTask = Box::new(item);
		{
			let mut state = self.shared.state.lock();
			if state.status != Status::Running {
				return false
			}
			state.items.push_back(item);
		}
		self.shared.available.notify_one();
		true
	}

	/// Locks the work queue to append many items at once, returning `None` if the
	/// pool isn't running. Workers are woken when the returned [`Batch`] is ended.
	///
	/// The calling thread must not queue work through any other method while the
	/// batch is alive, as the queue lock isn't reentrant.
	pub fn begin_batch(&self) -> Option<Batch<'_>> {
		let state = self.shared.state.lock();
		if state.status != Status::Running {
			return None
		}
		Some(Batch::new(state, &self.shared, self.options.threads))
	}

	/// Queues `task`, returning a handle to retrieve its result. A panic in `task`
	/// is caught and reported through the handle as [`TaskError::Panicked`].
	///
	/// # Errors
	///
	/// Returns [`Error::Stopped`] if the pool isn't running; the task is dropped.
	pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (handle, sender) = TaskHandle::new();
		let item = move || {
			let result = panic::catch_unwind(AssertUnwindSafe(task))
				.map_err(|payload| TaskError::Panicked(panic_message(&*payload)));
			// The handle may have been dropped; the result is discarded then.
			let _ = sender.send(result);
		};

		if self.queue_work_item(item) {
			Ok(handle)
		} else {
			Err(Error::Stopped)
		}
	}

	/// Stops the pool: new work is refused, idle workers are woken to exit, and the
	/// pool's [`CancelToken`] is cancelled to end cooperative long-running work.
	/// Items already running finish normally. Stopping a pool that isn't running
	/// does nothing.
	pub fn stop(&self) {
		let cancel = {
			let mut state = self.shared.state.lock();
			if state.status != Status::Running {
				return
			}
			state.status = Status::Stopping;
			state.cancel.clone()
		};

		self.shared.available.notify_all();
		cancel.cancel();
		tracing::debug!("worker pool stopping");
	}

	/// Blocks until every worker thread has exited, then drops items left in the
	/// queue. Worker threads only exit once the pool is stopped, so this blocks
	/// until some thread calls [`stop`](Self::stop). Returns immediately if there
	/// are no threads to join.
	pub fn wait(&self) {
		let mut threads = self.threads.lock();
		if !threads.is_empty() {
			self.join(&mut threads);
		}
	}

	/// Returns the number of items waiting in the queue.
	pub fn queue_size(&self) -> usize {
		self.shared.state.lock().items.len()
	}

	/// Returns `true` if the pool is started and not stopped.
	pub fn is_running(&self) -> bool {
		self.shared.state.lock().status == Status::Running
	}

	/// Returns the number of worker threads the pool runs.
	pub fn thread_count(&self) -> usize { self.options.threads }

	/// Returns the pool's options.
	pub fn options(&self) -> &WorkerOptions { &self.options }

	/// Returns a clone of the current run's cancellation token, cancelled when the
	/// pool is stopped.
	pub fn cancel_token(&self) -> CancelToken {
		self.shared.state.lock().cancel.clone()
	}

	fn join(&self, threads: &mut Vec<JoinHandle<()>>) {
		for handle in threads.drain(..) {
			if handle.join().is_err() {
				tracing::error!("worker thread panicked");
			}
		}

		let unstarted = {
			let mut state = self.shared.state.lock();
			state.status = Status::Stopped;
			mem::take(&mut state.items)
		};
		tracing::debug!(dropped = unstarted.len(), "worker pool joined");
	}
}

impl Drop for WorkerPool {
	fn drop(&mut self) {
		self.stop();
		self.wait();
	}
}

impl Shared {
	fn wake(&self, count: usize, threads: usize) {
		if count >= threads {
			self.available.notify_all();
		} else {
			for _ in 0..count {
				self.available.notify_one();
			}
		}
	}
}

/// The dispatch loop. Idle workers wait for an item or shutdown; shutdown is
/// checked before every wait and after every wakeup, so a stopped pool leaves
/// remaining items unstarted.
fn run(shared: &Shared, index: usize) {
	loop {
		let item = {
			let mut state = shared.state.lock();
			loop {
				if state.status != Status::Running {
					tracing::debug!(index, "worker thread exiting");
					return
				}

				if let Some(item) = state.items.pop_front() {
					break item
				}

				shared.available.wait(&mut state);
			}
		};

		execute(item);
	}
}
