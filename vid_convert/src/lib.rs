//! vid-convert - batch video conversion through an external FFmpeg engine
//!
//! The crate does no media work itself. It:
//! - turns user options into an FFmpeg argument vector (`ffmpeg_args`)
//! - runs one engine process per file and commits the output atomically
//!   (`runner`)
//! - runs the file list sequentially or on a bounded worker pool
//!   (`orchestrator`)
//!
//! ```rust,ignore
//! use vid_convert::{run, ConvertConfig};
//! use std::path::PathBuf;
//!
//! let config = ConvertConfig {
//!     inputs: vec![PathBuf::from("holiday.mov")],
//!     ..Default::default()
//! };
//! run(&config)?;
//! ```

pub mod ffmpeg_args;
pub mod job;
pub mod options;
pub mod orchestrator;
pub mod runner;

#[cfg(all(test, unix))]
mod test_support;

pub use ffmpeg_args::{build_ffmpeg_args, TargetRate};
pub use job::{build_jobs, output_path_for, ConversionJob, JobPlan};
pub use options::{
    Compression, CompressionPreset, ConvertConfig, EncodeOptions, ExecutionMode, QualityPreset,
    RawEncodeOptions,
};
pub use orchestrator::{run, run_jobs};
pub use runner::{process_job, run_job, temp_output_path, JobOutcome};

pub use shared_utils::batch::BatchResult;
pub use shared_utils::errors::{ConvertError, JobError, Result};
