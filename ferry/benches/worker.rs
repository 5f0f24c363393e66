// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use criterion::{black_box, Criterion, criterion_group, criterion_main};
use ferry::WorkerPool;

const ITEMS: usize = 1000;

fn dispatch(c: &mut Criterion) {
	let pool = WorkerPool::new(4).unwrap();
	pool.start().unwrap();
	let mut group = c.benchmark_group("dispatch");

	group.bench_function("queue_work_item", |b| b.iter(|| {
		let (sender, receiver) = flume::bounded(ITEMS);
		for i in 0..ITEMS {
			let sender = sender.clone();
			pool.queue_work_item(move || { let _ = sender.send(black_box(i)); });
		}
		for _ in 0..ITEMS {
			receiver.recv().unwrap();
		}
	}));

	group.bench_function("batch", |b| b.iter(|| {
		let done = Arc::new(AtomicUsize::new(0));
		let (sender, receiver) = flume::bounded(1);
		if let Some(mut batch) = pool.begin_batch() {
			for _ in 0..ITEMS {
				let done = done.clone();
				let sender = sender.clone();
				batch.queue_work_item(move || {
					if done.fetch_add(1, Ordering::AcqRel) + 1 == ITEMS {
						let _ = sender.send(());
					}
				});
			}
		}
		receiver.recv().unwrap();
	}));

	group.bench_function("submit", |b| b.iter(|| {
		let handles = (0..ITEMS).map(|i| pool.submit(move || black_box(i) * 2).unwrap())
								.collect::<Vec<_>>();
		handles.into_iter()
			   .map(|handle| handle.join().unwrap())
			   .sum::<usize>()
	}));
	group.finish();

	pool.stop();
	pool.wait();
}

criterion_group!(benches, dispatch);
criterion_main!(benches);
