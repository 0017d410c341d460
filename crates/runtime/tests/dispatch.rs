// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A hand-rolled consumer draining `Operation`s from a `DispatchQueue`.

use std::{
	sync::{Arc, Barrier, Mutex},
	thread,
};

use strand_runtime::{DispatchQueue, Error, Operation, slot};

fn spawn_consumer(queue: Arc<DispatchQueue<Operation>>) -> thread::JoinHandle<usize> {
	thread::spawn(move || {
		let mut executed = 0;
		while let Some(op) = queue.take() {
			op.call();
			executed += 1;
		}
		executed
	})
}

#[test]
fn test_operations_execute_in_submission_order() {
	let queue = Arc::new(DispatchQueue::new());
	let consumer = spawn_consumer(Arc::clone(&queue));
	let log = Arc::new(Mutex::new(Vec::new()));

	for seq in 0..500u32 {
		let log = Arc::clone(&log);
		queue.put(Operation::new(move |_: &mut ()| log.lock().unwrap().push(seq))).unwrap();
	}
	queue.close_with(Operation::new(|_: &mut ()| {})).unwrap();
	assert_eq!(consumer.join().unwrap(), 501);

	assert_eq!(*log.lock().unwrap(), (0..500).collect::<Vec<_>>());
}

#[test]
fn test_barrier_ordered_producers_keep_global_order() {
	let queue = Arc::new(DispatchQueue::new());
	let consumer = spawn_consumer(Arc::clone(&queue));
	let log = Arc::new(Mutex::new(Vec::new()));
	let barrier = Arc::new(Barrier::new(2));

	let first = {
		let (queue, log, barrier) = (Arc::clone(&queue), Arc::clone(&log), Arc::clone(&barrier));
		thread::spawn(move || {
			queue.put(Operation::new(move |_: &mut ()| log.lock().unwrap().push("first"))).unwrap();
			barrier.wait();
		})
	};
	let second = {
		let (queue, log, barrier) = (Arc::clone(&queue), Arc::clone(&log), Arc::clone(&barrier));
		thread::spawn(move || {
			barrier.wait();
			queue.put(Operation::new(move |_: &mut ()| log.lock().unwrap().push("second"))).unwrap();
		})
	};
	first.join().unwrap();
	second.join().unwrap();

	let (writer, reader) = slot();
	queue.close_with(Operation::new(move |_: &mut ()| writer.fulfill(Ok(())))).unwrap();
	reader.wait().unwrap();
	assert_eq!(consumer.join().unwrap(), 3);

	assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_rejected_operation_is_dropped() {
	let queue: DispatchQueue<Operation> = DispatchQueue::new();
	queue.close();

	let (writer, reader) = slot::<()>();
	let rejected = queue.put(Operation::new(move |_: &mut ()| writer.fulfill(Ok(()))));

	assert_eq!(rejected, Err(Error::Stopped));
	assert_eq!(reader.wait(), Err(Error::Abandoned));
}
