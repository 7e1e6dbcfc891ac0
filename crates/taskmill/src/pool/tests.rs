use super::{PoolConfig, SubmitOutcome, WorkerPool};
use crate::counter::{AtomicCounter, Counter};
use crate::error::Error;
use std::time::Duration;

fn counting_pool(workers: usize, queue_capacity: usize, counter: AtomicCounter) -> WorkerPool<String> {
    WorkerPool::start(
        PoolConfig {
            workers,
            queue_capacity,
        },
        move |_item| {
            counter.increment();
            Ok(())
        },
    )
    .expect("pool should start")
}

#[test]
fn start_rejects_zero_workers() {
    let config = PoolConfig {
        workers: 0,
        queue_capacity: 4,
    };
    let err = WorkerPool::<String>::start(config, |_item| Ok(()))
        .err()
        .expect("zero workers must be rejected");
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn shutdown_processes_every_submitted_item() {
    let counter = AtomicCounter::new();
    let pool = counting_pool(4, 8, counter.clone());

    for i in 0..100 {
        pool.submit(format!("item-{i}")).await.unwrap();
    }
    pool.shutdown().await.unwrap();

    assert_eq!(counter.get(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn buffered_items_drain_before_workers_exit() {
    // Slow the handler down so items are still buffered when shutdown
    // closes the queue.
    let counter = AtomicCounter::new();
    let pool = {
        let counter = counter.clone();
        WorkerPool::start(
            PoolConfig {
                workers: 2,
                queue_capacity: 16,
            },
            move |_item: String| {
                std::thread::sleep(Duration::from_millis(2));
                counter.increment();
                Ok(())
            },
        )
        .unwrap()
    };

    for i in 0..16 {
        pool.submit(format!("item-{i}")).await.unwrap();
    }
    pool.shutdown().await.unwrap();

    assert_eq!(counter.get(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn try_submit_never_blocks_and_accounts_for_every_item() {
    let counter = AtomicCounter::new();
    let pool = {
        let counter = counter.clone();
        WorkerPool::start(
            PoolConfig {
                workers: 1,
                queue_capacity: 1,
            },
            move |_item: String| {
                std::thread::sleep(Duration::from_millis(100));
                counter.increment();
                Ok(())
            },
        )
        .unwrap()
    };

    let total = 50;
    let mut accepted = 0_u64;
    let mut dropped = 0_u64;
    for i in 0..total {
        match pool.try_submit(format!("item-{i}")).unwrap() {
            SubmitOutcome::Accepted => accepted += 1,
            SubmitOutcome::Dropped => dropped += 1,
        }
    }

    assert_eq!(accepted + dropped, total);
    assert!(dropped > 0, "a full queue should have dropped something");

    pool.shutdown().await.unwrap();
    assert_eq!(counter.get(), accepted);
}

#[tokio::test]
async fn submitting_after_shutdown_fails_fast() {
    let counter = AtomicCounter::new();
    let pool = counting_pool(2, 4, counter);
    pool.shutdown().await.unwrap();

    match pool.submit("late".to_string()).await {
        Err(Error::PoolShutdown) => {}
        other => panic!("expected PoolShutdown, got {other:?}"),
    }
    match pool.try_submit("late".to_string()) {
        Err(Error::PoolShutdown) => {}
        other => panic!("expected PoolShutdown, got {other:?}"),
    }

    // A second shutdown is a no-op.
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn zero_capacity_degrades_to_tight_handoff() {
    let counter = AtomicCounter::new();
    let pool = counting_pool(2, 0, counter.clone());

    for i in 0..10 {
        pool.submit(format!("item-{i}")).await.unwrap();
    }
    pool.shutdown().await.unwrap();

    assert_eq!(counter.get(), 10);
}

#[tokio::test]
async fn handler_errors_do_not_halt_other_items() {
    let counter = AtomicCounter::new();
    let pool = {
        let counter = counter.clone();
        WorkerPool::start(
            PoolConfig {
                workers: 4,
                queue_capacity: 8,
            },
            move |item: String| {
                if item.ends_with("bad") {
                    return Err("unprocessable item".into());
                }
                counter.increment();
                Ok(())
            },
        )
        .unwrap()
    };

    for i in 0..50 {
        let suffix = if i % 5 == 0 { "bad" } else { "ok" };
        pool.submit(format!("item-{i}-{suffix}")).await.unwrap();
    }
    pool.shutdown().await.unwrap();

    // 10 of the 50 items fail; the rest are all processed.
    assert_eq!(counter.get(), 40);
}
