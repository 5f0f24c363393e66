// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::{BufRead, ErrorKind, Read, Write};
use crate::Pool;
use super::ByteQueue;

impl<P: Pool> ByteQueue<P> {
	/// Reads bytes from `reader` directly into the queue's spare chunk space, with
	/// a single call to [`Read::read`]. At most `max` bytes are read, fewer if the
	/// last chunk has less room. Returns the number of bytes read; zero means the
	/// reader reached its end, or `max` is zero.
	pub fn read_from(&mut self, reader: &mut impl Read, max: usize) -> io::Result<usize> {
		if max == 0 { return Ok(0) }

		let acquired = self.reserve_tail();
		let tail = self.tail_mut();
		let limit = tail.len().min(max);
		let result = loop {
			match reader.read(&mut tail[..limit]) {
				Err(error) if error.kind() == ErrorKind::Interrupted => continue,
				result => break result
			}
		};

		match result {
			Ok(count) if count > 0 => {
				self.back += count;
				self.len  += count;
			}
			_ => if let Some(previous_back) = acquired {
				self.unreserve_tail(previous_back)
			}
		}
		result
	}

	/// Writes readable bytes to `writer` until the queue is empty, consuming what
	/// was written. Returns the number of bytes written. If the writer would block
	/// after some bytes were written, returns early with that count.
	pub fn write_to(&mut self, writer: &mut impl Write) -> io::Result<usize> {
		let mut written = 0;
		while !self.is_empty() {
			match writer.write(self.front_slice()) {
				Ok(0) => return Err(ErrorKind::WriteZero.into()),
				Ok(count) => {
					self.consume(count);
					written += count;
				}
				Err(error) if error.kind() == ErrorKind::Interrupted => { }
				Err(error) if error.kind() == ErrorKind::WouldBlock && written > 0 => break,
				Err(error) => return Err(error)
			}
		}
		Ok(written)
	}

	/// Returns a [`Read`]er that consumes bytes from the front of the queue.
	pub fn reader(&mut self) -> Reader<'_, P> {
		Reader(self)
	}
}

impl<P: Pool> Write for ByteQueue<P> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		ByteQueue::write(self, buf);
		Ok(buf.len())
	}

	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		ByteQueue::write(self, buf);
		Ok(())
	}

	fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

/// A consuming [`Read`] and [`BufRead`] view of a [`ByteQueue`], returned by
/// [`ByteQueue::reader`]. Unlike [`ByteQueue::read`], reading through this type
/// removes the bytes from the queue.
#[derive(Debug)]
pub struct Reader<'q, P: Pool>(&'q mut ByteQueue<P>);

impl<P: Pool> Read for Reader<'_, P> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Self(queue) = self;
		let count = queue.read(buf);
		queue.consume(count);
		Ok(count)
	}
}

impl<P: Pool> BufRead for Reader<'_, P> {
	fn fill_buf(&mut self) -> io::Result<&[u8]> {
		Ok(self.0.front_slice())
	}

	fn consume(&mut self, amt: usize) {
		self.0.consume(amt)
	}
}

#[cfg(feature = "bytes")]
impl<P: Pool> bytes::Buf for ByteQueue<P> {
	fn remaining(&self) -> usize { self.len() }

	fn chunk(&self) -> &[u8] { self.front_slice() }

	fn advance(&mut self, cnt: usize) { self.consume(cnt) }
}
