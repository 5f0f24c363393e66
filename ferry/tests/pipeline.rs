// SPDX-License-Identifier: Apache-2.0

use std::io::{BufRead, Cursor};
use pretty_assertions::assert_eq;
use ferry::{ByteQueue, ChunkPool, WorkerPool};

/// Parses newline-terminated requests out of a queue fed by small reads, handles
/// them on a worker pool, and collects the responses into an outgoing queue.
#[test]
fn request_response() {
	let chunks = ChunkPool::new(6).unwrap();
	let workers = WorkerPool::new(3).unwrap();
	workers.start().unwrap();

	let input = (0..50).map(|i| format!("request {i}\n")).collect::<String>();
	let mut socket = Cursor::new(input.into_bytes());
	let mut incoming = ByteQueue::new(chunks.clone());
	let mut pending = Vec::new();
	while incoming.read_from(&mut socket, 4).unwrap() > 0 {
		while incoming.slices().any(|slice| slice.contains(&b'\n')) {
			let mut line = String::new();
			incoming.reader().read_line(&mut line).unwrap();
			pending.push(workers.submit(move || line.to_uppercase()).unwrap());
		}
	}
	assert!(incoming.is_empty());
	assert_eq!(pending.len(), 50);

	let mut outgoing = ByteQueue::new(chunks.clone());
	for handle in pending {
		outgoing.write(handle.join().unwrap().as_bytes());
	}

	let mut sent = Vec::new();
	outgoing.write_to(&mut sent).unwrap();
	let expected = (0..50).map(|i| format!("REQUEST {i}\n")).collect::<String>();
	assert_eq!(String::from_utf8(sent).unwrap(), expected);

	workers.stop();
	workers.wait();
	drop(incoming);
	drop(outgoing);
	assert_eq!(chunks.stats().in_use(), 0);
}
