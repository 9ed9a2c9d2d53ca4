//! Background job worker.
//!
//! Polls the durable queue and runs claimed jobs through the processor.
//! Claims up to `max_concurrent_jobs` at a time; sleeps only when the
//! queue is empty.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use tubebrief_core::config::WorkerConfig;
use tubebrief_core::{JobRepository, ProcessingJob, Result};

use crate::processor::VideoProcessor;

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join_handle: tokio::task::JoinHandle<()>,
}

impl WorkerHandle {
    /// Signal the worker to shut down and wait for in-flight jobs to finish.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(()).await;
        self.join_handle
            .await
            .map_err(|e| tubebrief_core::Error::Internal(format!("worker task panicked: {}", e)))
    }
}

/// Job worker that processes queued video references.
pub struct JobWorker {
    jobs: Arc<dyn JobRepository>,
    processor: Arc<VideoProcessor>,
    config: WorkerConfig,
}

impl JobWorker {
    /// Create a new job worker.
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        processor: Arc<VideoProcessor>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            jobs,
            processor,
            config,
        }
    }

    /// Start the worker and return a handle for control.
    pub fn start(self) -> WorkerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let worker = Arc::new(self);
        let join_handle = tokio::spawn(async move {
            worker.run(&mut shutdown_rx).await;
        });

        WorkerHandle {
            shutdown_tx,
            join_handle,
        }
    }

    #[instrument(skip(self, shutdown_rx), fields(subsystem = "pipeline", component = "worker"))]
    async fn run(self: &Arc<Self>, shutdown_rx: &mut mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!("Job worker is disabled, not starting");
            return;
        }

        info!(
            poll_interval_ms = self.config.poll_interval_ms,
            max_concurrent = self.config.max_concurrent_jobs,
            "Job worker started"
        );

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if shutdown_rx.try_recv().is_ok() {
                info!("Job worker received shutdown signal");
                break;
            }

            let mut tasks = tokio::task::JoinSet::new();
            for _ in 0..self.config.max_concurrent_jobs {
                match self.claim_job().await {
                    Some(job) => {
                        let worker = Arc::clone(self);
                        tasks.spawn(async move {
                            worker.execute_job(job).await;
                        });
                    }
                    None => break,
                }
            }

            if tasks.is_empty() {
                // Queue empty, sleep before polling again
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Job worker received shutdown signal");
                        break;
                    }
                    _ = sleep(poll_interval) => {}
                }
            } else {
                debug!(claimed = tasks.len(), "Processing job batch");
                while let Some(result) = tasks.join_next().await {
                    if let Err(e) = result {
                        error!(error = ?e, "Job task panicked");
                    }
                }
            }
        }

        info!("Job worker stopped");
    }

    async fn claim_job(&self) -> Option<ProcessingJob> {
        match self.jobs.claim_next().await {
            Ok(job) => job,
            Err(e) => {
                error!(error = ?e, "Failed to claim job");
                None
            }
        }
    }

    /// Run one claimed job through the processor and record the outcome.
    async fn execute_job(&self, job: ProcessingJob) {
        let start = Instant::now();
        let job_id = job.id;

        info!(job_id = %job_id, video_reference = %job.video_reference, "Processing job");

        match self
            .processor
            .process_video(job.user_id, &job.video_reference)
            .await
        {
            Ok(record) => {
                if let Err(e) = self.jobs.complete(job_id).await {
                    error!(error = ?e, job_id = %job_id, "Failed to mark job as completed");
                } else {
                    info!(
                        job_id = %job_id,
                        record_id = %record.id,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Job completed"
                    );
                }
            }
            Err(e) => {
                let retryable = e.is_retryable();
                if let Err(mark_err) = self.jobs.fail(job_id, &e.to_string(), retryable).await {
                    error!(error = ?mark_err, job_id = %job_id, "Failed to mark job as failed");
                } else {
                    warn!(
                        job_id = %job_id,
                        error = %e,
                        retryable,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Job failed"
                    );
                }
            }
        }
    }
}
