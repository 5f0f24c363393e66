// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;

/// A unit of deferred work, run at most once by a worker thread.
///
/// Implemented for any `FnOnce() + Send + 'static` closure.
pub trait Task: Send + 'static {
	/// Runs the task, consuming it.
	fn run(self: Box<Self>);
}

impl<F: FnOnce() + Send + 'static> Task for F {
	#[inline]
	fn run(self: Box<Self>) { (*self)() }
}

pub(crate) type BoxedTask = Box<dyn Task>;

/// Runs `task`, catching and logging a panic so the worker survives it.
pub(super) fn execute(task: BoxedTask) {
	if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
		tracing::error!(panic = %panic_message(&*payload), "work item panicked");
	}
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"Box<dyn Any>".to_owned()
	}
}
