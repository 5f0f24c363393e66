// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(dead_code, unused_macros)]

use std::cell::RefCell;
use std::fmt::{Arguments, Debug};
use std::rc::Rc;
use ferry::{Chunk, Pool};

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

#[derive(Default)]
struct InnerMockPool {
	cache: Vec<Chunk>,
	allocated: usize,
	acquired: usize,
	released: usize,
}

/// A single-threaded pool counting chunks in and out, filling every new chunk
/// with garbage so tests catch reads of unwritten memory.
#[derive(Clone)]
pub struct MockPool {
	chunk_size: usize,
	inner: Rc<RefCell<InnerMockPool>>,
}

impl MockPool {
	pub fn new(chunk_size: usize) -> Self {
		Self { chunk_size, inner: Rc::default() }
	}

	/// Returns the number of chunks acquired and not yet released.
	pub fn outstanding(&self) -> usize {
		let inner = self.inner.borrow();
		inner.acquired - inner.released
	}

	pub fn allocated(&self) -> usize { self.inner.borrow().allocated }

	pub fn released(&self) -> usize { self.inner.borrow().released }
}

impl Pool for MockPool {
	fn chunk_size(&self) -> usize { self.chunk_size }

	fn acquire(&self) -> Chunk {
		let mut inner = self.inner.borrow_mut();
		inner.acquired += 1;
		inner.cache.pop().unwrap_or_else(|| {
			inner.allocated += 1;
			let mut chunk = Chunk::new(self.chunk_size);
			chunk.slice_mut(0..self.chunk_size).fill(0xAA);
			chunk
		})
	}

	fn release(&self, chunk: Chunk) {
		let mut inner = self.inner.borrow_mut();
		inner.released += 1;
		inner.cache.push(chunk);
	}
}
