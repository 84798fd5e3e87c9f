//! Fixed pool of long-lived render threads with a per-frame barrier.
//!
//! Every worker blocks on its own start channel. [`WorkerPool::scatter`]
//! sends one task to each of the first `K` workers, then blocks until `K`
//! completion messages come back on the shared done channel. The channel
//! hand-off is the release/acquire pair that makes a task's writes visible
//! to the caller once `scatter` returns.

use std::{
    io,
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::Mutex,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, warn};
use thiserror::Error;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("{tasks} tasks dispatched to a pool of {workers} workers")]
    TooManyTasks { tasks: usize, workers: usize },

    #[error("task on render worker {0} panicked")]
    TaskPanicked(usize),

    #[error("render worker {0} has shut down")]
    WorkerGone(usize),
}

/// Completion signal: which worker finished and whether its task returned normally.
struct Done {
    worker: usize,
    ok: bool,
}

struct Worker {
    start: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

pub struct WorkerPool {
    workers: Vec<Worker>,
    /// Locked for the whole of a `scatter` so barriers never interleave.
    done: Mutex<Receiver<Done>>,
}

impl WorkerPool {
    /// Spawn `count` render threads. They live until the pool is dropped.
    pub fn new(count: usize) -> io::Result<Self> {
        let (done_tx, done_rx) = unbounded();
        let mut workers = Vec::with_capacity(count);

        for index in 0..count {
            let (start_tx, start_rx) = bounded::<Job>(1);
            let done_tx = done_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("render-{index}"))
                .spawn(move || worker_loop(index, start_rx, done_tx))?;
            workers.push(Worker {
                start: Some(start_tx),
                handle: Some(handle),
            });
        }
        debug!("spawned {count} render workers");

        Ok(Self {
            workers,
            done: Mutex::new(done_rx),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Run every task on its own worker and wait for all of them.
    ///
    /// Task `i` runs on worker `i`; workers past `tasks.len()` stay idle.
    /// Tasks may borrow from the caller's stack: nothing borrowed outlives
    /// this call because it only returns once every dispatched task has
    /// finished (or unwound). A panicking task is reported as
    /// [`PoolError::TaskPanicked`] after the barrier, never mid-way.
    pub fn scatter<'scope, F>(&self, tasks: Vec<F>) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'scope,
    {
        if tasks.len() > self.workers.len() {
            return Err(PoolError::TooManyTasks {
                tasks: tasks.len(),
                workers: self.workers.len(),
            });
        }

        let done = self.done.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut first_err = None;
        let mut in_flight = 0;

        for (index, task) in tasks.into_iter().enumerate() {
            let job: Box<dyn FnOnce() + Send + 'scope> = Box::new(task);
            // SAFETY: the lifetime is only erased for the time the job sits on
            // a worker. Every job that is sent is waited for below before we
            // return; a job whose send fails comes straight back and is
            // dropped on this thread.
            let job: Job = unsafe { std::mem::transmute(job) };

            let sent = self.workers[index]
                .start
                .as_ref()
                .map(|tx| tx.send(job).is_ok())
                .unwrap_or(false);
            if sent {
                in_flight += 1;
            } else {
                first_err.get_or_insert(PoolError::WorkerGone(index));
            }
        }

        while in_flight > 0 {
            match done.recv() {
                Ok(Done { worker, ok }) => {
                    in_flight -= 1;
                    if !ok {
                        warn!("render task on worker {worker} panicked");
                        first_err.get_or_insert(PoolError::TaskPanicked(worker));
                    }
                }
                // Every worker thread has exited, so nothing is still running.
                Err(_) => {
                    first_err.get_or_insert(PoolError::WorkerGone(0));
                    break;
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for w in &mut self.workers {
            w.start.take();
        }
        for (index, w) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = w.handle.take() {
                if handle.join().is_err() {
                    warn!("render worker {index} did not shut down cleanly");
                }
            }
        }
        debug!("render workers joined");
    }
}

fn worker_loop(index: usize, start: Receiver<Job>, done: Sender<Done>) {
    // Idle until a job arrives, run it, report, back to idle.
    for job in start.iter() {
        let ok = panic::catch_unwind(AssertUnwindSafe(job)).is_ok();
        if done.send(Done { worker: index, ok }).is_err() {
            break;
        }
    }
}

/// Cut `0..len` into at most `parts` contiguous, non-empty, ascending ranges.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    (0..parts)
        .map(|i| i * len / parts..(i + 1) * len / parts)
        .filter(|r| !r.is_empty())
        .collect()
}
