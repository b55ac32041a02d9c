//! A fixed-size fork-join pool with dynamic chunk claiming.
//!
//! Workers are spawned once and sleep on a condition variable between jobs. A job is a
//! half-open index range plus a task; every worker repeatedly claims the next `grain` indices
//! from a shared atomic cursor and runs the task on them until the range is exhausted. Cheap
//! and expensive regions of the range therefore balance themselves across workers without any
//! up-front partitioning.
//!
//! # Example
//!
//! ```
//! use rs_gravity::parallel::ThreadPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let mut pool = ThreadPool::new(4);
//! let sum = AtomicUsize::new(0);
//! pool.parallel_for(0, 100_000, 1, |start, stop| {
//!     let local: usize = (start..stop).sum();
//!     sum.fetch_add(local, Ordering::Relaxed);
//! });
//! assert_eq!(sum.into_inner(), (0..100_000).sum::<usize>());
//! ```
use log::{debug, warn};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use crate::utils::MIN_PARALLEL_GRAIN;

type Task<'a> = dyn Fn(usize, usize) + Sync + 'a;

struct JobState {
    /// Only `Some` while a job is in flight, see `ThreadPool::dispatch`.
    task: Option<&'static Task<'static>>,
    end: usize,
    grain: usize,
    job_id: u64,
    finished_job_id: u64,
    stop: bool,
    panicked: bool,
}

struct Shared {
    state: Mutex<JobState>,
    start: Condvar,
    done: Condvar,
    cursor: AtomicUsize,
    remaining: AtomicUsize,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, JobState> {
        // Task panics are caught before they can poison the lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Persistent worker pool exposing a blocking parallel range operation.
///
/// `parallel_for` takes `&mut self`, so at most one job is ever in flight and a task cannot
/// re-enter the pool that is running it.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns `worker_count` workers (at least one).
    ///
    /// If the OS refuses to spawn a thread the pool keeps the workers it already has; with none
    /// at all every job runs on the calling thread.
    pub fn new(worker_count: usize) -> Self {
        let requested = if worker_count == 0 {
            warn!("Thread pool requested with 0 workers, using 1");
            1
        } else {
            worker_count
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(JobState {
                task: None,
                end: 0,
                grain: MIN_PARALLEL_GRAIN,
                job_id: 0,
                finished_job_id: 0,
                stop: false,
                panicked: false,
            }),
            start: Condvar::new(),
            done: Condvar::new(),
            cursor: AtomicUsize::new(0),
            remaining: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(requested);
        for index in 0..requested {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("gravity-worker-{}", index))
                .spawn(move || worker_loop(worker_shared));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    warn!("Failed to spawn worker {} ({}), continuing with {} workers", index, err, workers.len());
                    break;
                }
            }
        }
        debug!("Thread pool started with {} workers", workers.len());

        Self { shared, workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len().max(1)
    }

    /// Runs `task` over `[begin, end)` split into contiguous sub-ranges and blocks until every
    /// sub-range has been processed.
    ///
    /// The union of the sub-ranges passed to `task` is exactly `[begin, end)`, without overlap.
    /// With a single worker, or when the range holds at most `2 * min_grain` indices, `task` is
    /// called once with the whole range on the calling thread. Otherwise the range is claimed
    /// in grains of `max(min_grain, 256)` indices.
    ///
    /// # Panics
    ///
    /// If `task` panics on a worker, the remaining work still drains and the panic is re-raised
    /// here once the job has finished.
    pub fn parallel_for<F>(&mut self, begin: usize, end: usize, min_grain: usize, task: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        if end <= begin {
            return;
        }
        let total = end - begin;
        if self.workers.len() <= 1 || total <= min_grain.saturating_mul(2) {
            task(begin, end);
            return;
        }
        self.dispatch(begin, end, min_grain, &task);
    }

    /// Mutable-slice flavour of [`ThreadPool::parallel_for`]: `task(start, chunk)` receives the
    /// claimed sub-range `data[start..start + chunk.len()]` for exclusive use.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_gravity::parallel::ThreadPool;
    ///
    /// let mut pool = ThreadPool::new(2);
    /// let mut squares = vec![0usize; 5_000];
    /// pool.parallel_chunks_mut(&mut squares, 64, |start, chunk| {
    ///     for (offset, slot) in chunk.iter_mut().enumerate() {
    ///         let i = start + offset;
    ///         *slot = i * i;
    ///     }
    /// });
    /// assert_eq!(squares[4_999], 4_999 * 4_999);
    /// ```
    pub fn parallel_chunks_mut<T, F>(&mut self, data: &mut [T], min_grain: usize, task: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let len = data.len();
        let output = DisjointSlice::new(data);
        self.parallel_for(0, len, min_grain, |start, stop| {
            // SAFETY: parallel_for hands every index of [0, len) to exactly one call.
            let chunk = unsafe { output.slice_mut(start, stop) };
            task(start, chunk);
        });
    }

    fn dispatch(&mut self, begin: usize, end: usize, min_grain: usize, task: &Task<'_>) {
        // SAFETY: the reference is only reachable through `JobState::task` while this call is
        // blocked below. Workers stop touching it before they decrement `remaining`, we return
        // only after the last decrement, and the slot is cleared before returning.
        let task: &'static Task<'static> = unsafe { std::mem::transmute::<&Task<'_>, &'static Task<'static>>(task) };

        let job = {
            let mut state = self.shared.lock_state();
            state.task = Some(task);
            state.end = end;
            state.grain = min_grain.max(MIN_PARALLEL_GRAIN);
            state.panicked = false;
            self.shared.cursor.store(begin, Ordering::Relaxed);
            self.shared.remaining.store(self.workers.len(), Ordering::Relaxed);
            state.job_id += 1;
            state.job_id
        };
        self.shared.start.notify_all();

        let panicked = {
            let state = self.shared.lock_state();
            let mut state = self
                .shared
                .done
                .wait_while(state, |s| s.finished_job_id != job)
                .unwrap_or_else(PoisonError::into_inner);
            state.task = None;
            std::mem::take(&mut state.panicked)
        };

        if panicked {
            panic!("parallel_for task panicked on a worker thread");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock_state();
            state.stop = true;
            state.job_id += 1;
        }
        self.shared.start.notify_all();

        let count = self.workers.len();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread exited with a panic");
            }
        }
        debug!("Thread pool joined {} workers", count);
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut last_seen = 0u64;
    loop {
        let (task, end, grain, job) = {
            let state = shared.lock_state();
            let state = shared
                .start
                .wait_while(state, |s| !s.stop && s.job_id == last_seen)
                .unwrap_or_else(PoisonError::into_inner);
            if state.stop {
                return;
            }
            last_seen = state.job_id;
            (state.task, state.end, state.grain, state.job_id)
        };

        let mut panicked = false;
        if let Some(task) = task {
            loop {
                let start = shared.cursor.fetch_add(grain, Ordering::Relaxed);
                if start >= end {
                    break;
                }
                let stop = start.saturating_add(grain).min(end);
                if panic::catch_unwind(AssertUnwindSafe(|| task(start, stop))).is_err() {
                    panicked = true;
                    break;
                }
            }
        }
        if panicked {
            shared.lock_state().panicked = true;
        }

        if shared.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            let mut state = shared.lock_state();
            state.finished_job_id = job;
            shared.done.notify_one();
        }
    }
}

/// Shares a mutable slice between workers that write provably disjoint sub-ranges.
struct DisjointSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: access goes through `slice_mut`, whose callers guarantee disjoint ranges; moving
// `T` values between threads requires `T: Send`.
unsafe impl<T: Send> Sync for DisjointSlice<'_, T> {}

impl<'a, T> DisjointSlice<'a, T> {
    fn new(slice: &'a mut [T]) -> Self {
        Self { ptr: slice.as_mut_ptr(), len: slice.len(), _marker: PhantomData }
    }

    /// # Safety
    ///
    /// Ranges requested by concurrent callers must not overlap.
    unsafe fn slice_mut(&self, start: usize, stop: usize) -> &mut [T] {
        assert!(start <= stop && stop <= self.len, "chunk {}..{} out of bounds for {}", start, stop, self.len);
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(start), stop - start) }
    }
}
