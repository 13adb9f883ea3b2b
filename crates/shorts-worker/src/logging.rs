//! Structured job logging utilities.

use shorts_models::JobId;
use tracing::{error, info, warn};

/// Job logger with consistent contextual fields (job id + stage).
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
}

impl JobLogger {
    pub fn new(job_id: &JobId) -> Self {
        Self {
            job_id: job_id.to_string(),
        }
    }

    pub fn stage(&self, stage: &str, message: &str) {
        info!(job_id = %self.job_id, stage = stage, "{}", message);
    }

    pub fn warning(&self, stage: &str, message: &str) {
        warn!(job_id = %self.job_id, stage = stage, "{}", message);
    }

    pub fn failure(&self, stage: &str, message: &str) {
        error!(job_id = %self.job_id, stage = stage, "Job failed: {}", message);
    }

    pub fn completion(&self, message: &str) {
        info!(job_id = %self.job_id, "Job completed: {}", message);
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger_creation() {
        let job_id = JobId::new();
        let logger = JobLogger::new(&job_id);
        assert_eq!(logger.job_id(), job_id.to_string());
    }
}
