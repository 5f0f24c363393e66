// SPDX-License-Identifier: Apache-2.0

use crate::{DEFAULT_CHUNK_SIZE, Error, Result};

/// Options for tuning [`ChunkPool`](super::ChunkPool).
///
/// # Chunk size
///
/// The fixed capacity of every chunk handed out by the pool, in bytes. Defaults
/// to `10KiB`. Every queue sharing the pool shares this size class; it cannot be
/// changed after the pool is created.
///
/// # Preallocation
///
/// The number of chunks to allocate up front and park in the cache, so the first
/// writes under load don't hit the allocator. Defaults to `0`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct PoolOptions {
	pub chunk_size: usize,
	pub preallocate: usize,
}

impl Default for PoolOptions {
	fn default() -> Self { Self::new() }
}

impl PoolOptions {
	/// Creates a new set of pool options.
	pub const fn new() -> Self {
		Self {
			chunk_size: DEFAULT_CHUNK_SIZE,
			preallocate: 0,
		}
	}

	/// Returns the chunk size.
	#[inline]
	pub const fn chunk_size(&self) -> usize { self.chunk_size }

	/// Returns the preallocated chunk count.
	#[inline]
	pub const fn preallocate(&self) -> usize { self.preallocate }

	/// Sets the chunk size.
	#[inline]
	pub const fn with_chunk_size(mut self, value: usize) -> Self {
		self.chunk_size = value;
		self
	}

	/// Sets the preallocated chunk count.
	#[inline]
	pub const fn with_preallocate(mut self, value: usize) -> Self {
		self.preallocate = value;
		self
	}

	pub(crate) fn validate(&self) -> Result {
		if self.chunk_size == 0 {
			Err(Error::ZeroChunkSize)
		} else {
			Ok(())
		}
	}
}
