// SPDX-License-Identifier: Apache-2.0

use std::sync::Barrier;
use std::sync::Arc;
use std::thread;
use pretty_assertions::assert_eq;
use ferry::{Chunk, ChunkPool, Error, Pool, PoolOptions, PoolStats};

#[test]
fn acquire_allocates_when_empty() {
	let pool = ChunkPool::new(16).unwrap();
	let chunk = pool.acquire();
	assert_eq!(chunk.capacity(), 16);
	assert_eq!(pool.stats(), PoolStats { allocated: 1, cached: 0 });
	assert_eq!(pool.stats().in_use(), 1);
}

#[test]
fn release_then_acquire_reuses() {
	let pool = ChunkPool::new(16).unwrap();
	let mut chunk = pool.acquire();
	chunk.slice_mut(0..4).copy_from_slice(b"data");
	pool.release(chunk);
	assert_eq!(pool.stats(), PoolStats { allocated: 1, cached: 1 });

	// Reused memory is not cleared.
	let chunk = pool.acquire();
	assert_eq!(chunk.slice(0..4), b"data");
	assert_eq!(pool.stats(), PoolStats { allocated: 1, cached: 0 });
}

#[test]
fn never_shrinks() {
	let pool = ChunkPool::new(8).unwrap();
	let chunks = (0..10).map(|_| pool.acquire()).collect::<Vec<_>>();
	for chunk in chunks {
		pool.release(chunk);
	}
	assert_eq!(pool.stats(), PoolStats { allocated: 10, cached: 10 });
}

#[test]
fn foreign_chunk_is_dropped() {
	let pool = ChunkPool::new(8).unwrap();
	pool.release(Chunk::new(32));
	assert_eq!(pool.stats(), PoolStats { allocated: 0, cached: 0 });
}

#[test]
fn preallocate() {
	let pool = ChunkPool::with_options(
		PoolOptions::new()
			.with_chunk_size(128)
			.with_preallocate(4)
	).unwrap();
	assert_eq!(pool.chunk_size(), 128);
	assert_eq!(pool.stats(), PoolStats { allocated: 4, cached: 4 });

	pool.reserve(2);
	assert_eq!(pool.stats().allocated, 4);
	pool.reserve(6);
	assert_eq!(pool.stats(), PoolStats { allocated: 6, cached: 6 });
}

#[test]
fn default_chunk_size() {
	let pool = ChunkPool::default();
	assert_eq!(pool.chunk_size(), ferry::DEFAULT_CHUNK_SIZE);
	assert_eq!(pool.acquire().capacity(), 10 * 1024);
}

#[test]
fn zero_chunk_size() {
	assert!(matches!(ChunkPool::new(0), Err(Error::ZeroChunkSize)));
}

#[test]
fn clones_share_cache() {
	let pool = ChunkPool::new(8).unwrap();
	let clone = pool.clone();
	clone.release(pool.acquire());
	assert_eq!(pool.stats(), PoolStats { allocated: 1, cached: 1 });
}

#[test]
fn concurrent_acquire_release() {
	const THREADS: usize = 8;
	let pool = ChunkPool::new(32).unwrap();
	let barrier = Arc::new(Barrier::new(THREADS));
	let threads = (0..THREADS).map(|_| {
		let pool = pool.clone();
		let barrier = barrier.clone();
		thread::spawn(move || {
			barrier.wait();
			for _ in 0..1000 {
				let a = pool.acquire();
				let b = pool.acquire();
				pool.release(a);
				pool.release(b);
			}
		})
	}).collect::<Vec<_>>();

	for thread in threads {
		thread.join().unwrap();
	}

	let stats = pool.stats();
	assert_eq!(stats.in_use(), 0);
	assert!(stats.allocated <= THREADS * 2);
}
