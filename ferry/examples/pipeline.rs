// SPDX-License-Identifier: Apache-2.0

//! Simulates a line-based server: request bytes arrive in small reads into a
//! byte queue, complete lines are parsed off the front, each request is handled
//! on a worker pool, and the responses are gathered into an outgoing queue that
//! is flushed to stdout.

use std::io::{BufRead, Cursor, stdout};
use ferry::{ByteQueue, ChunkPool, PoolOptions, WorkerOptions, WorkerPool};
use tracing::info;

const REQUESTS: &str = "\
	ECHO hello\n\
	UPPER chunked queues\n\
	REVERSE worker pool\n\
	LEN the quick brown fox\n\
	NOPE\n";

fn handle(line: String) -> String {
	let (command, argument) = line.split_once(' ').unwrap_or((line.as_str(), ""));
	match command {
		"ECHO"    => argument.to_owned(),
		"UPPER"   => argument.to_uppercase(),
		"REVERSE" => argument.chars().rev().collect(),
		"LEN"     => argument.len().to_string(),
		_ => format!("unknown command {command:?}")
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_max_level(tracing::Level::DEBUG)
		.init();

	// Tiny chunks so requests straddle chunk boundaries.
	let chunks = ChunkPool::with_options(
		PoolOptions::new()
			.with_chunk_size(8)
			.with_preallocate(4)
	)?;
	let workers = WorkerPool::with_options(
		WorkerOptions::new()
			.with_threads(2)
			.with_name("pipeline")
	)?;
	workers.start()?;

	let mut incoming = ByteQueue::new(chunks.clone());
	let mut socket = Cursor::new(REQUESTS.as_bytes());
	let mut pending = Vec::new();
	while incoming.read_from(&mut socket, 5)? > 0 {
		let mut line = String::new();
		while contains_line(&incoming) {
			line.clear();
			incoming.reader().read_line(&mut line)?;
			let request = line.trim_end().to_owned();
			info!(%request, "dispatching");
			pending.push(workers.submit(move || handle(request))?);
		}
	}

	let mut outgoing = ByteQueue::new(chunks.clone());
	for response in pending {
		let mut response = response.join()?;
		response.push('\n');
		outgoing.write(response.as_bytes());
	}
	outgoing.write_to(&mut stdout().lock())?;

	workers.stop();
	workers.wait();
	info!(stats = ?chunks.stats(), "done");
	Ok(())
}

fn contains_line(queue: &ByteQueue) -> bool {
	queue.slices().any(|slice| slice.contains(&b'\n'))
}
