// SPDX-License-Identifier: Apache-2.0

mod io;

pub use io::Reader;

use std::collections::VecDeque;
use std::fmt;
use std::fmt::{Debug, Formatter};
use all_asserts::assert_le;
use itertools::{Itertools, Position};
use crate::{Chunk, ChunkPool, Pool};

/// A double-ended byte accumulator built from chunks acquired from a [`Pool`].
///
/// Bytes are appended with [`write`](Self::write), peeked with
/// [`read`](Self::read), and released with [`consume`](Self::consume). Only the
/// first and last chunks can be partially occupied: `front` marks the first
/// unread byte of the first chunk, `back` the first unwritten byte of the last.
/// A chunk goes back to the pool as soon as its last readable byte is consumed,
/// so a drained queue holds no chunks at all and is indistinguishable from a new
/// one.
///
/// Queues aren't synchronized; each has one owner at a time.
pub struct ByteQueue<P: Pool = ChunkPool> {
	chunks: VecDeque<Chunk>,
	front: usize,
	back: usize,
	len: usize,
	pool: P,
}

impl<P: Pool> Debug for ByteQueue<P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ByteQueue")
			.field("chunks", &self.chunks.len())
			.field("front", &self.front)
			.field("back", &self.back)
			.field("len", &self.len)
			.finish_non_exhaustive()
	}
}

impl<P: Pool> ByteQueue<P> {
	/// Creates a new, empty queue drawing chunks from `pool`. No chunk is acquired
	/// until the first write.
	pub fn new(pool: P) -> Self {
		debug_assert!(pool.chunk_size() > 0, "pool chunks must not be empty");
		Self {
			chunks: VecDeque::new(),
			front: 0,
			back: 0,
			len: 0,
			pool,
		}
	}

	/// Returns the pool chunks are drawn from.
	#[inline]
	pub fn pool(&self) -> &P { &self.pool }

	/// Returns the number of readable bytes.
	#[inline]
	pub fn len(&self) -> usize { self.len }

	/// Returns `true` if the queue has no readable bytes.
	#[inline]
	pub fn is_empty(&self) -> bool { self.len == 0 }

	/// Returns the number of chunks held by the queue.
	#[inline]
	pub fn chunk_count(&self) -> usize { self.chunks.len() }

	/// Appends `data` to the back of the queue, acquiring chunks from the pool as
	/// the last one fills up. Writing an empty slice does nothing.
	pub fn write(&mut self, mut data: &[u8]) {
		while !data.is_empty() {
			self.reserve_tail();
			let Some(last) = self.chunks.back_mut() else { break };
			let count = last.write_at(self.back, data);
			self.back += count;
			self.len  += count;
			data = &data[count..];
		}
	}

	/// Copies bytes from the front of the queue into `buf` without consuming them,
	/// returning the number of bytes copied. This is at most `buf.len()`, and less
	/// only if the queue holds fewer bytes.
	pub fn read(&self, buf: &mut [u8]) -> usize {
		let mut read = 0;
		for slice in self.slices() {
			if read == buf.len() { break }

			let count = slice.len().min(buf.len() - read);
			buf[read..read + count].copy_from_slice(&slice[..count]);
			read += count;
		}
		read
	}

	/// Discards `count` bytes from the front of the queue, releasing every chunk
	/// emptied along the way back to the pool.
	///
	/// # Panics
	///
	/// Panics if `count` is greater than [`len`](Self::len).
	pub fn consume(&mut self, mut count: usize) {
		assert_le!(count, self.len, "cannot consume past the end of the queue");
		self.len -= count;

		while count > 0 {
			let Some(first) = self.chunks.front() else { break };
			let end = if self.chunks.len() == 1 { self.back } else { first.capacity() };
			let available = end - self.front;
			if count < available {
				self.front += count;
				break
			}

			count -= available;
			self.release_front();
		}
	}

	/// Consumes all bytes, releasing every chunk.
	pub fn clear(&mut self) {
		for chunk in self.chunks.drain(..) {
			self.pool.release(chunk);
		}
		self.front = 0;
		self.back  = 0;
		self.len   = 0;
	}

	/// Returns an iterator over the readable range of each chunk, front to back.
	pub fn slices(&self) -> impl Iterator<Item = &[u8]> + '_ {
		let Self { front, back, .. } = *self;
		self.chunks.iter().with_position().map(move |chunk| match chunk {
			Position::Only  (chunk) => chunk.slice(front..back),
			Position::First (chunk) => chunk.slice(front..chunk.capacity()),
			Position::Middle(chunk) => chunk.slice(0..chunk.capacity()),
			Position::Last  (chunk) => chunk.slice(0..back),
		})
	}

	/// Copies all readable bytes into a new vector.
	pub fn to_vec(&self) -> Vec<u8> {
		let mut vec = Vec::with_capacity(self.len);
		for slice in self.slices() {
			vec.extend_from_slice(slice);
		}
		vec
	}

	/// Returns the readable range of the first chunk, empty if the queue is empty.
	pub(crate) fn front_slice(&self) -> &[u8] {
		self.slices().next().unwrap_or_default()
	}

	/// Makes sure the last chunk has room to write, acquiring a new one if the queue
	/// is empty or the last chunk is full. Returns the previous back offset if a
	/// chunk was acquired.
	fn reserve_tail(&mut self) -> Option<usize> {
		let is_full = match self.chunks.back() {
			Some(last) => self.back == last.capacity(),
			None => true
		};

		is_full.then(|| {
			self.chunks.push_back(self.pool.acquire());
			std::mem::replace(&mut self.back, 0)
		})
	}

	/// Undoes [`reserve_tail`](Self::reserve_tail) when nothing was written to the
	/// acquired chunk.
	fn unreserve_tail(&mut self, previous_back: usize) {
		if let Some(chunk) = self.chunks.pop_back() {
			self.pool.release(chunk);
		}
		self.back = if self.chunks.is_empty() { 0 } else { previous_back };
	}

	/// Returns the unwritten space of the last chunk.
	fn tail_mut(&mut self) -> &mut [u8] {
		let back = self.back;
		match self.chunks.back_mut() {
			Some(last) => {
				let end = last.capacity();
				last.slice_mut(back..end)
			}
			None => &mut []
		}
	}

	fn release_front(&mut self) {
		if let Some(chunk) = self.chunks.pop_front() {
			self.pool.release(chunk);
		}
		self.front = 0;
		if self.chunks.is_empty() {
			self.back = 0;
		}
	}
}

impl<P: Pool> Drop for ByteQueue<P> {
	fn drop(&mut self) {
		self.clear()
	}
}
