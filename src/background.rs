//! Background execution for blocking collaborator calls.
//!
//! Snapshot fetches and area submissions block on the network, so they run
//! on a small worker pool. Their results are queued and only handed to the
//! completion callbacks when the event loop calls `process_results()`, which
//! keeps every state mutation on the event thread.
//!
//! Dropping the executor drops all callbacks that have not run yet, so a
//! torn-down view never receives a late completion.

use crate::constants::DEFAULT_WORKERS;
use parking_lot::Mutex;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, error};

/// Outcome of a background task.
pub type TaskResult<T> = Result<T, String>;

type Job = Box<dyn FnOnce() + Send + 'static>;
type Payload = Box<dyn Any + Send>;
type Completion = Box<dyn FnOnce(Payload)>;

pub struct BackgroundExecutor {
    jobs: Option<Sender<Job>>,
    results_tx: Sender<(u64, Payload)>,
    results_rx: Receiver<(u64, Payload)>,
    callbacks: RefCell<HashMap<u64, Completion>>,
    next_id: Cell<u64>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl BackgroundExecutor {
    pub fn new(worker_count: usize) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let jobs_rx = Arc::new(Mutex::new(jobs_rx));
        let (results_tx, results_rx) = mpsc::channel();

        let workers = (0..worker_count.max(1))
            .map(|i| {
                let jobs_rx = Arc::clone(&jobs_rx);
                thread::Builder::new()
                    .name(format!("yardmap-worker-{}", i))
                    .spawn(move || {
                        loop {
                            let job = jobs_rx.lock().recv();
                            match job {
                                Ok(job) => job(),
                                Err(_) => break,
                            }
                        }
                    })
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!("Failed to spawn background worker: {}", e);
                    None
                }
            })
            .collect();

        Self {
            jobs: Some(jobs_tx),
            results_tx,
            results_rx,
            callbacks: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            workers,
        }
    }

    pub fn with_default_workers() -> Self {
        Self::new(DEFAULT_WORKERS)
    }

    /// Run `task` on a worker; `on_complete` runs on the thread that calls
    /// `process_results()`.
    pub fn spawn<T, F, C>(&self, name: &str, task: F, on_complete: C)
    where
        T: Send + 'static,
        F: FnOnce() -> TaskResult<T> + Send + 'static,
        C: FnOnce(TaskResult<T>) + 'static,
    {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let completion: Completion = Box::new(move |payload: Payload| {
            let result = match payload.downcast::<TaskResult<T>>() {
                Ok(result) => *result,
                Err(_) => Err("task result type mismatch".to_string()),
            };
            on_complete(result);
        });
        self.callbacks.borrow_mut().insert(id, completion);

        let results_tx = self.results_tx.clone();
        let task_name = name.to_string();
        let job: Job = Box::new(move || {
            let result: TaskResult<T> = catch_unwind(AssertUnwindSafe(task))
                .unwrap_or_else(|_| Err(format!("task '{}' panicked", task_name)));
            // Receiver gone means the executor was dropped; nothing to deliver to.
            let _ = results_tx.send((id, Box::new(result)));
        });

        let sent = self
            .jobs
            .as_ref()
            .map(|jobs| jobs.send(job).is_ok())
            .unwrap_or(false);
        if sent {
            debug!(task = name, id, "Background task queued");
        } else {
            error!(task = name, "Background executor is shut down");
            if let Some(callback) = self.callbacks.borrow_mut().remove(&id) {
                callback(Box::new(TaskResult::<T>::Err("executor shut down".to_string())));
            }
        }
    }

    /// Deliver finished results to their callbacks. Returns how many ran.
    pub fn process_results(&self) -> usize {
        let mut delivered = 0;
        while let Ok((id, payload)) = self.results_rx.try_recv() {
            let callback = self.callbacks.borrow_mut().remove(&id);
            if let Some(callback) = callback {
                callback(payload);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn has_pending(&self) -> bool {
        !self.callbacks.borrow().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl Default for BackgroundExecutor {
    fn default() -> Self {
        Self::with_default_workers()
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        self.callbacks.borrow_mut().clear();
        // Closing the job channel lets idle workers exit; busy ones finish
        // their current job and find no receiver for the result.
        self.jobs.take();
        self.workers.clear();
    }
}
