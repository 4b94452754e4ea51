//! Orchestrator: runs the job list sequentially or on a bounded pool.

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use shared_utils::batch::BatchResult;
use shared_utils::errors::{ConvertError, Result};
use shared_utils::report::print_summary_report;
use shared_utils::thread_manager::concurrent_worker_count;

use crate::job::{build_jobs, ConversionJob};
use crate::options::{ConvertConfig, ExecutionMode};
use crate::runner::{process_job, JobOutcome};

/// Run every job and return once all of them have finished.
///
/// Outcomes are returned in input order for both modes. Job failures are
/// contained in their `JobOutcome`; nothing here aborts early.
pub fn run_jobs(jobs: &[ConversionJob], mode: ExecutionMode, engine: &Path) -> Vec<JobOutcome> {
    match mode {
        ExecutionMode::Sequential => jobs.iter().map(|job| process_job(job, engine)).collect(),
        ExecutionMode::Concurrent { workers } => {
            let pool_size = concurrent_worker_count(jobs.len(), workers);
            let pool = match rayon::ThreadPoolBuilder::new()
                .num_threads(pool_size)
                .thread_name(|i| format!("convert-{}", i))
                .build()
            {
                Ok(pool) => pool,
                Err(e) => {
                    warn!(error = %e, "⚠️  Failed to create worker pool, running sequentially");
                    return run_jobs(jobs, ExecutionMode::Sequential, engine);
                }
            };

            info!(
                "🔧 Running {} jobs on {} workers",
                jobs.len(),
                pool_size
            );
            pool.install(|| jobs.par_iter().map(|job| process_job(job, engine)).collect())
        }
    }
}

/// Fold outcomes into a tally; missing inputs count as skipped.
pub fn tally(outcomes: &[JobOutcome], skipped: usize) -> BatchResult {
    let mut result = BatchResult::new();
    for _ in 0..skipped {
        result.skip();
    }
    for outcome in outcomes {
        match &outcome.result {
            Ok(_) => result.success(),
            Err(e) => result.fail(outcome.input.clone(), e.to_string()),
        }
    }
    result
}

fn check_engine(engine: &Path) {
    match shared_utils::resolve_tool(engine) {
        Some(resolved) => info!(engine = %resolved.display(), "Using transcoding engine"),
        None => warn!(
            "⚠️  Transcoding engine '{}' not found, conversions will fail",
            engine.display()
        ),
    }
}

/// Whole conversion run.
///
/// Errors only when the output directory cannot be created or no input file
/// exists; individual job failures still return `Ok`.
pub fn run(config: &ConvertConfig) -> Result<BatchResult> {
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir).map_err(|source| ConvertError::CreateOutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    let plan = build_jobs(config);
    if plan.jobs.is_empty() {
        return Err(ConvertError::NoValidInputs);
    }

    check_engine(&config.engine);

    let start = Instant::now();
    let outcomes = run_jobs(&plan.jobs, config.mode, &config.engine);
    let result = tally(&outcomes, plan.skipped.len());

    print_summary_report(&result, start.elapsed(), "Video Conversion");
    println!("All conversions completed!");

    Ok(result)
}
