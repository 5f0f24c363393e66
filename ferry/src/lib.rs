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

//! ## How it works
//!
//! Socket data is written to and read from fixed-size bits of memory called
//! *chunks*. When a chunk is fully consumed, it's returned to a *pool*. To write
//! data, chunks are acquired from this pool, and when the pool is empty new chunks
//! are allocated. The pool only ever grows; chunks cycle between queues and the
//! pool cache until the pool itself is dropped. A pool is an explicit object, a
//! cheap handle shared by every queue constructed from it, so each server (or
//! test) owns the lifetime of its memory.
//!
//! ### Byte queues
//!
//! A [`ByteQueue`] is a double-ended byte accumulator made of a sequence of
//! chunks. Bytes are written to the back, peeked from the front with
//! [`read`](ByteQueue::read), and released with [`consume`](ByteQueue::consume)
//! once a protocol layer recognizes a complete message. Only the first and last
//! chunks may be partially occupied; a chunk is handed back to the pool the
//! moment its last readable byte is consumed. Queues are single-owner and aren't
//! synchronized; concurrency between queues sharing one pool is handled by the
//! pool's lock alone.
//!
//! ### Worker pools
//!
//! A [`WorkerPool`] runs work items on a fixed set of threads draining a shared
//! FIFO queue. Items can be queued one at a time, in batches under a single lock
//! acquisition, or submitted with a [`TaskHandle`] to retrieve their result.
//! Shutdown is two-phase: [`stop`](WorkerPool::stop) raises the shutdown flag
//! and cancels the pool's [`CancelToken`], [`wait`](WorkerPool::wait) joins the
//! threads. Items already running always finish; queued items that were never
//! started are dropped.
//!
//! The chunk pool lock and the work queue lock are never held at the same time.

mod chunk;
mod error;
pub mod pool;
pub mod queue;
pub mod worker;

pub use chunk::Chunk;
pub use error::*;
pub use pool::{ChunkPool, Pool, PoolOptions, PoolStats};
pub use queue::ByteQueue;
pub use worker::{Batch, CancelToken, Task, TaskHandle, WorkerOptions, WorkerPool};

/// The default chunk capacity, 10KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024;
