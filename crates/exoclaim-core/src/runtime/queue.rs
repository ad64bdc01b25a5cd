// crates/exoclaim-core/src/runtime/queue.rs
// ============================================================================
// Module: Exoclaim Serialized Write Queue
// Description: Single-worker queue executing mutating operations in order.
// Purpose: Guarantee global mutual exclusion for claim-mutating operations.
// Dependencies: std::{sync::mpsc, thread}, thiserror
// ============================================================================

//! ## Overview
//! All claim-mutating operations funnel through one [`WriteQueue`] per
//! process. Operations submitted concurrently execute strictly one at a time
//! in submission order, independent of which resource they target. An
//! operation's failure is reported only to its own caller; the worker keeps
//! processing subsequent operations.
//!
//! The queue imposes no timeout. A caller that stops waiting for its result
//! does not cancel the operation: once enqueued, the operation runs to
//! completion and persists if it succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc;
use std::thread;

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A queued unit of work, already bound to its reply channel.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Write queue errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The worker has shut down and no further operations are accepted.
    #[error("write queue closed")]
    Closed,
}

/// Serialized write queue backed by a single worker thread.
///
/// # Invariants
/// - Operations execute one at a time, in the order their submissions reached
///   the channel.
/// - Constructed once per process and shared by reference across handlers.
#[derive(Debug)]
pub struct WriteQueue {
    /// Submission side of the job channel; `None` once shutdown has begun.
    sender: Option<mpsc::Sender<Job>>,
    /// Worker handle, joined on drop.
    worker: Option<thread::JoinHandle<()>>,
}

impl WriteQueue {
    /// Creates the queue and spawns its worker thread.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker = thread::spawn(move || {
            while let Ok(job) = receiver.recv() {
                job();
            }
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Submits an operation and blocks until the worker has executed it.
    ///
    /// The operation's own result, success or failure, is returned to this
    /// caller only. If this caller abandons the wait, the operation still
    /// runs; its result is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] when the worker has shut down before
    /// the operation could run.
    pub fn enqueue<T, F>(&self, operation: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, result) = mpsc::sync_channel::<T>(1);
        let job: Job = Box::new(move || {
            // A disconnected receiver means the caller stopped waiting; the
            // operation has already run, so the result is simply dropped.
            let _ = reply.send(operation());
        });
        self.sender
            .as_ref()
            .ok_or(QueueError::Closed)?
            .send(job)
            .map_err(|_| QueueError::Closed)?;
        result.recv().map_err(|_| QueueError::Closed)
    }
}

impl Default for WriteQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain queued jobs and exit.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
