// SPDX-License-Identifier: Apache-2.0

mod options;

pub use options::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use crate::{Chunk, Result};

/// A source of recycled chunks, shared between byte queues.
///
/// Implementations must be cheap to clone; clones refer to the same cache.
pub trait Pool: Clone {
	/// Returns the capacity of chunks in this pool.
	fn chunk_size(&self) -> usize;

	/// Acquires a chunk, reusing a released one if possible. Contents of reused
	/// chunks are left as-is.
	fn acquire(&self) -> Chunk;

	/// Releases a chunk back into the pool for reuse.
	fn release(&self, chunk: Chunk);
}

/// A snapshot of a [`ChunkPool`]'s counters.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
	/// The number of chunks the pool has ever allocated.
	pub allocated: usize,
	/// The number of chunks parked in the cache.
	pub cached: usize,
}

impl PoolStats {
	/// Returns the number of chunks currently held outside the pool.
	pub fn in_use(&self) -> usize {
		self.allocated.saturating_sub(self.cached)
	}
}

/// The default [`Pool`], a mutex-guarded cache of chunks of one fixed size. The
/// cache only grows; chunks are freed when the last handle to the pool drops.
#[derive(Clone, Debug)]
pub struct ChunkPool(Arc<PoolInner>);

#[derive(Debug)]
struct PoolInner {
	chunk_size: usize,
	allocated: AtomicUsize,
	cache: Mutex<Vec<Chunk>>,
}

impl Default for ChunkPool {
	fn default() -> Self {
		Self::from_valid(PoolOptions::default())
	}
}

impl ChunkPool {
	/// Creates a new pool handing out chunks of `chunk_size` bytes.
	pub fn new(chunk_size: usize) -> Result<Self> {
		Self::with_options(PoolOptions::new().with_chunk_size(chunk_size))
	}

	/// Creates a new pool from `options`.
	pub fn with_options(options: PoolOptions) -> Result<Self> {
		options.validate()?;
		Ok(Self::from_valid(options))
	}

	fn from_valid(PoolOptions { chunk_size, preallocate }: PoolOptions) -> Self {
		let pool = Self(Arc::new(PoolInner {
			chunk_size,
			allocated: AtomicUsize::new(0),
			cache: Mutex::default(),
		}));
		pool.reserve(preallocate);
		pool
	}

	/// Allocates chunks until at least `count` are cached.
	pub fn reserve(&self, count: usize) {
		let Self(inner) = self;
		let mut cache = inner.cache.lock();
		let missing = count.saturating_sub(cache.len());
		cache.reserve(missing);
		cache.extend((0..missing).map(|_| inner.allocate()));
	}

	/// Returns a snapshot of the pool's counters.
	pub fn stats(&self) -> PoolStats {
		let Self(inner) = self;
		let cached = inner.cache.lock().len();
		PoolStats {
			allocated: inner.allocated.load(Ordering::Relaxed),
			cached,
		}
	}
}

impl PoolInner {
	fn allocate(&self) -> Chunk {
		let total = self.allocated.fetch_add(1, Ordering::Relaxed) + 1;
		tracing::trace!(chunk_size = self.chunk_size, total, "allocating chunk");
		Chunk::new(self.chunk_size)
	}
}

impl Pool for ChunkPool {
	#[inline]
	fn chunk_size(&self) -> usize { self.0.chunk_size }

	fn acquire(&self) -> Chunk {
		let Self(inner) = self;
		// Pop under the lock, allocate outside of it.
		let reused = inner.cache.lock().pop();
		reused.unwrap_or_else(|| inner.allocate())
	}

	fn release(&self, chunk: Chunk) {
		let Self(inner) = self;
		if chunk.capacity() != inner.chunk_size {
			tracing::warn!(
				capacity = chunk.capacity(),
				chunk_size = inner.chunk_size,
				"dropping chunk released to a pool of a different size"
			);
			return
		}

		inner.cache.lock().push(chunk)
	}
}
