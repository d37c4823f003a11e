use crate::config::TracerConfig;
use crate::worker::{DispatchJob, DispatchWorker};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Asynchronous job-execution service for [`DispatchJob`]s.
///
/// Jobs land on a bounded queue and are drained by a background task that
/// hands each one to the [`DispatchWorker`]. Submission never blocks and
/// never fails toward the caller: a full queue drops the job, bumps a
/// counter and emits a `tracing` warning.
///
/// Execution is at-least-once, not exactly-once. A job whose worker run
/// panics is re-run up to `retry_limit` times; sub-batches already written
/// by a prior attempt are written again. Store errors the worker contains
/// do not count as failures here.
#[derive(Clone)]
pub struct JobExecutor {
    sender: mpsc::Sender<DispatchJob>,
    queue: String,
    submitted_jobs: Arc<AtomicU64>,
    dropped_jobs: Arc<AtomicU64>,
}

impl JobExecutor {
    /// Spawn the background drain task and return the executor handle.
    ///
    /// The returned [`JoinHandle`] completes once every clone of the
    /// executor has been dropped and the already-queued jobs have been
    /// worked off. Jobs are not cancellable after submission.
    pub fn spawn(worker: DispatchWorker, config: &TracerConfig) -> (Self, JoinHandle<()>) {
        let queue_depth = config.queue_depth.max(1);
        let (sender, mut receiver) = mpsc::channel::<DispatchJob>(queue_depth);

        let submitted_jobs = Arc::new(AtomicU64::new(0));
        let dropped_jobs = Arc::new(AtomicU64::new(0));

        let queue = config.queue.clone();
        let retry_limit = config.retry_limit;

        let drain_queue = queue.clone();
        let handle = tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                run_with_retries(&worker, job, retry_limit, &drain_queue).await;
            }
        });

        (
            JobExecutor {
                sender,
                queue,
                submitted_jobs,
                dropped_jobs,
            },
            handle,
        )
    }

    /// Enqueue a job for asynchronous execution. Fire-and-forget.
    pub fn submit(&self, job: impl Into<DispatchJob>) {
        self.submitted_jobs.fetch_add(1, Ordering::Relaxed);

        if self.sender.try_send(job.into()).is_err() {
            self.dropped_jobs.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(queue = %self.queue, "dispatch queue full, dropping job");
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Jobs handed to [`submit`](JobExecutor::submit) so far.
    pub fn submitted_jobs(&self) -> u64 {
        self.submitted_jobs.load(Ordering::Relaxed)
    }

    /// Jobs dropped because the queue was full.
    pub fn dropped_jobs(&self) -> u64 {
        self.dropped_jobs.load(Ordering::Relaxed)
    }
}

/// Run one job, re-running it after an uncaught (panicked) worker failure
/// up to `retry_limit` times. Each attempt gets its own task so a panic is
/// observable as a `JoinError` instead of taking the drain loop down.
async fn run_with_retries(
    worker: &DispatchWorker,
    job: DispatchJob,
    retry_limit: u32,
    queue: &str,
) {
    let mut attempt: u32 = 0;
    loop {
        let worker = worker.clone();
        let job_for_attempt = job.clone();
        let run = tokio::spawn(async move { worker.run(job_for_attempt).await });

        match run.await {
            Ok(()) => return,
            Err(err) => {
                if attempt >= retry_limit {
                    tracing::error!(
                        queue,
                        attempts = attempt + 1,
                        "dispatch job abandoned: {err}"
                    );
                    return;
                }
                attempt += 1;
                tracing::warn!(queue, attempt, "dispatch job failed, retrying: {err}");
            }
        }
    }
}
