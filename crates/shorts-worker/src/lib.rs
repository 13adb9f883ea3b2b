//! Batch rendering worker.
//!
//! Discovers narration tracks, pairs each with a planned background
//! segment and caption timeline, and renders finished shorts through a
//! bounded worker pool.

pub mod config;
pub mod error;
pub mod executor;
pub mod jobs;
pub mod logging;
pub mod pipeline;
pub mod words;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::{BatchExecutor, BatchReport};
pub use jobs::discover_jobs;
pub use pipeline::{run_job, JobError, PipelineContext};
pub use words::load_words;
