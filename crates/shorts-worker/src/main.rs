//! Batch rendering worker binary.

use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shorts_media::{check_ffmpeg, check_ffprobe, AssetCatalog, MusicCatalog};
use shorts_worker::{discover_jobs, BatchExecutor, PipelineContext, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::from_default_env().add_directive("shorts=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting shorts-worker");

    // Load configuration
    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    // Fail fast if the media tools are missing
    if let Err(e) = check_ffmpeg() {
        error!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = check_ffprobe() {
        error!("{}", e);
        std::process::exit(1);
    }

    // Catalog background assets; an empty catalog is fatal before any
    // job starts rather than a failure per job.
    let catalog = match AssetCatalog::load(&config.background_dir).await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load background catalog: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        assets = catalog.len(),
        dir = %config.background_dir.display(),
        "Background catalog loaded"
    );

    let music = match &config.music_dir {
        Some(dir) => match MusicCatalog::load(dir).await {
            Ok(m) if m.is_empty() => None,
            Ok(m) => {
                info!(tracks = m.len(), dir = %dir.display(), "Music catalog loaded");
                Some(Arc::new(m))
            }
            Err(e) => {
                error!("Failed to load music catalog: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };
    if music.is_none() {
        warn!("No music tracks available; rendering narration only");
    }

    // Ensure the output directory exists before jobs race to publish
    if let Err(e) = tokio::fs::create_dir_all(&config.output_dir).await {
        error!(
            "Failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        );
        std::process::exit(1);
    }

    // Discover the batch
    let jobs = match discover_jobs(&config.narration_dir, &config.output_dir).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Job discovery failed: {}", e);
            std::process::exit(1);
        }
    };
    if jobs.is_empty() {
        warn!(
            dir = %config.narration_dir.display(),
            "No narration files found, nothing to do"
        );
        return;
    }
    info!(jobs = jobs.len(), seed = config.base_seed, "Batch discovered");

    let ctx = PipelineContext {
        catalog: Arc::new(catalog),
        music,
        encoding: Default::default(),
        output_spec: Default::default(),
        base_seed: config.base_seed,
        randomize: config.randomize,
        job_timeout_secs: config.job_timeout.as_secs(),
    };

    let executor = Arc::new(BatchExecutor::new(config.max_concurrent_jobs));

    // Setup signal handler: first Ctrl-C drains the batch
    let signal_executor = Arc::clone(&executor);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal, cancelling batch");
        signal_executor.shutdown();
    });

    // Run the batch
    let report = executor
        .run_batch(jobs, move |job, cancel_rx| {
            let ctx = ctx.clone();
            async move { shorts_worker::run_job(&ctx, &job, cancel_rx).await }
        })
        .await;

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        cancelled = report.cancelled(),
        "Worker finished"
    );

    if report.succeeded() == 0 && report.failed() > 0 {
        std::process::exit(1);
    }
}
