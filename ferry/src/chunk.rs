// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Range;

/// A fixed-capacity, contiguous block of memory. Chunks are recycled through a
/// [`Pool`](crate::Pool), so their contents are never cleared between owners;
/// which bytes are valid is tracked entirely by the owning queue.
pub struct Chunk(Box<[u8]>);

impl Chunk {
	/// Allocates a new, zeroed chunk of `capacity` bytes.
	pub fn new(capacity: usize) -> Self {
		Self(vec![0; capacity].into_boxed_slice())
	}

	/// Returns the fixed capacity of the chunk.
	#[inline]
	pub fn capacity(&self) -> usize { self.0.len() }

	/// Returns the bytes in `range`.
	#[inline]
	pub fn slice(&self, range: Range<usize>) -> &[u8] { &self.0[range] }

	/// Returns the bytes in `range` mutably.
	#[inline]
	pub fn slice_mut(&mut self, range: Range<usize>) -> &mut [u8] { &mut self.0[range] }

	/// Copies as much of `data` as fits at `offset`, returning the number of bytes
	/// copied.
	pub(crate) fn write_at(&mut self, offset: usize, data: &[u8]) -> usize {
		let target = &mut self.0[offset..];
		let count = target.len().min(data.len());
		target[..count].copy_from_slice(&data[..count]);
		count
	}
}

impl Debug for Chunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Chunk")
			.field("capacity", &self.capacity())
			.finish_non_exhaustive()
	}
}
