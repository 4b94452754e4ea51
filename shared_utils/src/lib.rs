//! Shared Utilities for the vid-convert tools
//!
//! - Logging setup (stderr + rolling log file)
//! - External engine process handling with combined output capture
//! - Worker allocation for concurrent runs
//! - Batch tally and summary report
//! - Error types shared by the converters

pub mod batch;
pub mod errors;
pub mod ffmpeg_process;
pub mod logging;
pub mod report;
pub mod thread_manager;
pub mod tools;

pub use batch::BatchResult;
pub use errors::{ConvertError, JobError};
pub use ffmpeg_process::{format_ffmpeg_error, run_to_completion, EngineOutput, FfmpegProcess};
pub use report::{format_duration, print_summary_report, round_to_secs};
pub use tools::resolve_tool;
