//! Bounded batch execution.
//!
//! Jobs run on a semaphore-limited pool of tokio tasks. Each job gets a
//! clone of the shutdown watch receiver; flipping the sender drains the
//! batch, with in-flight encodes killed and queued jobs reported as
//! cancelled. One job failing never touches its siblings.

use metrics::counter;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tracing::{error, info};

use shorts_models::{JobOutcome, RenderJob};

use crate::logging::JobLogger;
use crate::pipeline::JobError;

/// Outcome of every job in the batch, in completion order.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, JobOutcome::Failed { .. }))
            .count()
    }

    pub fn cancelled(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, JobOutcome::Cancelled { .. }))
            .count()
    }
}

/// Runs a batch of jobs with bounded concurrency.
pub struct BatchExecutor {
    max_concurrent_jobs: usize,
    shutdown: watch::Sender<bool>,
}

impl BatchExecutor {
    pub fn new(max_concurrent_jobs: usize) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            max_concurrent_jobs: max_concurrent_jobs.max(1),
            shutdown,
        }
    }

    /// Signal every job to stop. Queued jobs finish as cancelled;
    /// running encodes are killed at the next opportunity.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Run all jobs through `run_job`, collecting one outcome per job.
    pub async fn run_batch<F, Fut>(&self, jobs: Vec<RenderJob>, run_job: F) -> BatchReport
    where
        F: Fn(RenderJob, watch::Receiver<bool>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<std::path::PathBuf, JobError>> + Send + 'static,
    {
        let total = jobs.len();
        info!(
            jobs = total,
            workers = self.max_concurrent_jobs,
            "Starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_jobs));
        let run_job = Arc::new(run_job);
        let mut handles = Vec::with_capacity(total);

        for job in jobs {
            let semaphore = Arc::clone(&semaphore);
            let run_job = Arc::clone(&run_job);
            let cancel_rx = self.shutdown.subscribe();

            handles.push(tokio::spawn(async move {
                // Closing the semaphore is not part of shutdown; a
                // failed acquire only happens if the executor is gone.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return JobOutcome::Cancelled {
                            job_id: job.id.clone(),
                        }
                    }
                };

                let job_id = job.id.clone();
                match run_job(job, cancel_rx).await {
                    Ok(output_path) => {
                        counter!("shorts_jobs_completed").increment(1);
                        JobOutcome::Completed {
                            job_id,
                            output_path,
                        }
                    }
                    Err(e) if e.cancelled => {
                        counter!("shorts_jobs_cancelled").increment(1);
                        JobOutcome::Cancelled { job_id }
                    }
                    Err(e) => {
                        counter!("shorts_jobs_failed").increment(1);
                        JobLogger::new(&job_id).failure(&e.stage, &e.error);
                        JobOutcome::Failed {
                            job_id,
                            stage: e.stage,
                            error: e.error,
                        }
                    }
                }
            }));
        }

        let mut outcomes = Vec::with_capacity(total);
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "Job task panicked"),
            }
        }

        let report = BatchReport { outcomes };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            "Batch finished"
        );
        report
    }
}
