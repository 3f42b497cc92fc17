/// Work queue and executor pool for bulk-add jobs
///
/// Jobs are pushed onto an unbounded queue and drained by a fixed number of
/// executor tasks, which bounds how many operations run at once. Shutdown
/// closes the queue and waits until every queued and in-flight job is done.
use super::worker::{BulkAddJob, BulkAddWorker};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

pub struct OperationDispatcher {
    sender: Mutex<Option<mpsc::UnboundedSender<BulkAddJob>>>,
    tracker: TaskTracker,
    worker_count: usize,
}

impl OperationDispatcher {
    /// Spawn `worker_count` executors (at least one) on the current runtime
    pub fn start(worker: Arc<BulkAddWorker>, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = mpsc::unbounded_channel::<BulkAddJob>();
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let tracker = TaskTracker::new();

        for executor in 0..worker_count {
            let receiver = Arc::clone(&receiver);
            let worker = Arc::clone(&worker);

            tracker.spawn(async move {
                loop {
                    // Hold the receiver only while waiting, not while working
                    let next = receiver.lock().await.recv().await;
                    let Some(job) = next else {
                        break;
                    };
                    log_debug!(
                        "Executor {} picked up operation {}",
                        executor,
                        job.operation_id
                    );
                    worker.run(job).await;
                }
                log_debug!("Executor {} stopped", executor);
            });
        }
        // No executors are added later; wait() resolves once they all exit
        tracker.close();

        log_info!("Bulk-add dispatcher started with {} executors", worker_count);

        Self {
            sender: Mutex::new(Some(sender)),
            tracker,
            worker_count,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Queue a job without waiting for it to run
    pub fn dispatch(&self, job: BulkAddJob) -> AppResult<()> {
        let guard = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let sender = guard.as_ref().ok_or_else(|| {
            AppError::InternalError("Bulk-add dispatcher has been shut down".to_string())
        })?;

        sender.send(job).map_err(|_| {
            AppError::InternalError("Bulk-add executors are no longer running".to_string())
        })
    }

    pub fn is_accepting(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Stop accepting work and wait for queued and running jobs to finish
    pub async fn shutdown(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if sender.is_some() {
            log_info!("Bulk-add dispatcher shutting down, draining queue");
        }
        drop(sender);

        self.tracker.wait().await;
        log_info!("Bulk-add dispatcher stopped");
    }
}
