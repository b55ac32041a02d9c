use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use crate::parallel::ThreadPool;

fn claimed_ranges(workers: usize, begin: usize, end: usize, min_grain: usize) -> Vec<(usize, usize)> {
    let mut pool = ThreadPool::new(workers);
    let ranges = Mutex::new(Vec::new());
    pool.parallel_for(begin, end, min_grain, |start, stop| {
        ranges.lock().unwrap().push((start, stop));
    });
    let mut ranges = ranges.into_inner().unwrap();
    ranges.sort_unstable();
    ranges
}

fn assert_exact_cover(ranges: &[(usize, usize)], begin: usize, end: usize) {
    assert!(!ranges.is_empty(), "no ranges claimed");
    assert_eq!(ranges[0].0, begin, "coverage does not start at begin");
    for window in ranges.windows(2) {
        assert_eq!(window[0].1, window[1].0, "gap or overlap between {:?} and {:?}", window[0], window[1]);
    }
    assert_eq!(ranges[ranges.len() - 1].1, end, "coverage does not stop at end");
    for &(start, stop) in ranges {
        assert!(start < stop, "empty range {}..{}", start, stop);
    }
}

#[test]
fn test_partition_covers_range_for_any_worker_count() {
    for &workers in &[1, 2, 8] {
        let ranges = claimed_ranges(workers, 17, 100_017, 1);
        assert_exact_cover(&ranges, 17, 100_017);
    }
}

#[test]
fn test_dispatched_chunks_follow_grain_grid() {
    // 10_000 > 2 * 300, so with 4 workers this is dispatched with grain max(300, 256) = 300.
    let ranges = claimed_ranges(4, 5, 10_005, 300);
    assert_exact_cover(&ranges, 5, 10_005);
    for &(start, stop) in &ranges {
        assert_eq!((start - 5) % 300, 0, "chunk {}..{} off the grain grid", start, stop);
        assert!(stop - start <= 300);
    }
    assert_eq!(ranges.len(), 34);
}

#[test]
fn test_grain_has_floor_of_256() {
    let ranges = claimed_ranges(3, 0, 4_096, 1);
    assert_exact_cover(&ranges, 0, 4_096);
    assert_eq!(ranges.len(), 16);
    assert!(ranges.iter().all(|&(start, stop)| stop - start == 256));
}

#[test]
fn test_reduction_identical_across_worker_counts() {
    let results: Vec<usize> = [1, 2, 8]
        .iter()
        .map(|&workers| {
            let mut pool = ThreadPool::new(workers);
            let counter = AtomicUsize::new(0);
            pool.parallel_for(0, 250_000, 64, |start, stop| {
                let local: usize = (start..stop).map(|i| i % 7).sum();
                counter.fetch_add(local, Ordering::Relaxed);
            });
            counter.into_inner()
        })
        .collect();
    let expected: usize = (0..250_000).map(|i| i % 7).sum();
    assert!(results.iter().all(|&r| r == expected), "results {:?} != {}", results, expected);
}

#[test]
fn test_small_range_runs_inline() {
    let mut pool = ThreadPool::new(4);
    let caller = thread::current().id();
    let calls = Mutex::new(Vec::new());
    pool.parallel_for(0, 100, 50, |start, stop| {
        calls.lock().unwrap().push((start, stop, thread::current().id()));
    });
    let calls = calls.into_inner().unwrap();
    assert_eq!(calls, vec![(0, 100, caller)]);
}

#[test]
fn test_single_worker_runs_inline() {
    let mut pool = ThreadPool::new(1);
    let caller = thread::current().id();
    let calls = Mutex::new(Vec::new());
    pool.parallel_for(0, 1_000_000, 1, |start, stop| {
        calls.lock().unwrap().push((start, stop, thread::current().id()));
    });
    assert_eq!(calls.into_inner().unwrap(), vec![(0, 1_000_000, caller)]);
}

#[test]
fn test_empty_and_inverted_ranges_do_nothing() {
    let mut pool = ThreadPool::new(2);
    let calls = AtomicUsize::new(0);
    pool.parallel_for(10, 10, 1, |_, _| {
        calls.fetch_add(1, Ordering::Relaxed);
    });
    pool.parallel_for(10, 3, 1, |_, _| {
        calls.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(calls.into_inner(), 0);
}

#[test]
fn test_zero_workers_clamped_to_one() {
    let pool = ThreadPool::new(0);
    assert_eq!(pool.worker_count(), 1);
}

#[test]
fn test_many_consecutive_jobs() {
    let mut pool = ThreadPool::new(4);
    for round in 0..200 {
        let counter = AtomicUsize::new(0);
        pool.parallel_for(0, 2_000 + round, 1, |start, stop| {
            counter.fetch_add(stop - start, Ordering::Relaxed);
        });
        assert_eq!(counter.into_inner(), 2_000 + round);
    }
}

#[test]
fn test_parallel_chunks_mut_writes_every_slot_once() {
    for &workers in &[1, 2, 8] {
        let mut pool = ThreadPool::new(workers);
        let mut data = vec![0usize; 20_000];
        pool.parallel_chunks_mut(&mut data, 1, |start, chunk| {
            for (offset, slot) in chunk.iter_mut().enumerate() {
                *slot += start + offset + 1;
            }
        });
        assert!(data.iter().enumerate().all(|(i, &v)| v == i + 1), "workers = {}", workers);
    }
}

#[test]
#[should_panic(expected = "parallel_for task panicked")]
fn test_worker_panic_is_reraised_on_caller() {
    let mut pool = ThreadPool::new(4);
    pool.parallel_for(0, 10_000, 1, |start, _| {
        if start == 0 {
            panic!("boom");
        }
    });
}

#[test]
fn test_pool_usable_after_task_panic() {
    let mut pool = ThreadPool::new(3);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pool.parallel_for(0, 10_000, 1, |start, _| {
            if start == 256 {
                panic!("boom");
            }
        });
    }));
    assert!(result.is_err());

    let counter = AtomicUsize::new(0);
    pool.parallel_for(0, 10_000, 1, |start, stop| {
        counter.fetch_add(stop - start, Ordering::Relaxed);
    });
    assert_eq!(counter.into_inner(), 10_000);
}

#[test]
fn test_drop_joins_idle_workers() {
    for _ in 0..50 {
        let pool = ThreadPool::new(4);
        drop(pool);
    }
}
