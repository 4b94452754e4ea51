//! Job runner: one engine invocation with an atomic commit.
//!
//! The engine always writes to `tmp_<name>` next to the final output, on the
//! same filesystem. Only after a zero exit is the temp file renamed into
//! place, so the destination is never observed half-written.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use shared_utils::ffmpeg_process::{format_ffmpeg_error, run_to_completion};
use shared_utils::report::{format_duration, round_to_secs};
use shared_utils::JobError;

use crate::ffmpeg_args::build_ffmpeg_args;
use crate::job::ConversionJob;

pub const TEMP_PREFIX: &str = "tmp_";

/// Finished job, successful or not.
#[derive(Debug)]
pub struct JobOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<Duration, JobError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// `<dir>/tmp_<file name>` for the given final output.
pub fn temp_output_path(output: &Path) -> PathBuf {
    let dir = output.parent().unwrap_or(Path::new(""));
    let mut name = OsString::from(TEMP_PREFIX);
    if let Some(file_name) = output.file_name() {
        name.push(file_name);
    }
    dir.join(name)
}

fn remove_temp(tmp: &Path) {
    match fs::remove_file(tmp) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %tmp.display(), error = %e, "Failed to remove temp file"),
    }
}

/// Move `tmp` over `dest`. `dest` is left untouched unless `tmp` exists.
fn commit(tmp: &Path, dest: &Path) -> Result<(), JobError> {
    if let Err(source) = fs::metadata(tmp) {
        return Err(JobError::Commit {
            from: tmp.to_path_buf(),
            to: dest.to_path_buf(),
            source,
        });
    }

    if fs::symlink_metadata(dest).is_ok() {
        if let Err(source) = fs::remove_file(dest) {
            remove_temp(tmp);
            return Err(JobError::RemoveExisting {
                path: dest.to_path_buf(),
                source,
            });
        }
    }

    if let Err(source) = fs::rename(tmp, dest) {
        remove_temp(tmp);
        return Err(JobError::Commit {
            from: tmp.to_path_buf(),
            to: dest.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Run `job` through `engine` and commit the result.
///
/// Returns the wall-clock time of the whole job. On any error the temp file
/// is gone and the destination is as it was before.
pub fn run_job(job: &ConversionJob, engine: &Path) -> Result<Duration, JobError> {
    let start = Instant::now();
    let tmp = temp_output_path(job.output_file());

    let mut args = build_ffmpeg_args(job);
    if let Some(last) = args.last_mut() {
        *last = tmp.clone().into_os_string();
    }

    let output = match run_to_completion(engine, &args) {
        Ok(output) => output,
        Err(e) => {
            remove_temp(&tmp);
            return Err(JobError::Spawn(e));
        }
    };

    if !output.success() {
        remove_temp(&tmp);
        return Err(JobError::EngineFailed {
            exit_code: output.exit_code(),
            output: output.combined,
        });
    }

    commit(&tmp, job.output_file())?;
    Ok(start.elapsed())
}

/// `run_job` plus console reporting. Never panics on job failure.
pub fn process_job(job: &ConversionJob, engine: &Path) -> JobOutcome {
    info!(
        "🎬 Converting {} to {}...",
        job.input_file().display(),
        job.output_file().display()
    );

    let result = run_job(job, engine);
    match &result {
        Ok(elapsed) => {
            info!(
                "✅ Successfully converted {} (took {})",
                job.input_file().display(),
                format_duration(round_to_secs(*elapsed))
            );
        }
        Err(JobError::EngineFailed { output, .. }) => {
            error!(
                "❌ Error converting {}: {}",
                job.input_file().display(),
                format_ffmpeg_error(output)
            );
            eprintln!("{}", output);
        }
        Err(e) => {
            error!("❌ Error converting {}: {}", job.input_file().display(), e);
        }
    }

    JobOutcome {
        input: job.input_file().to_path_buf(),
        output: job.output_file().to_path_buf(),
        result,
    }
}
