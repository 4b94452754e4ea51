//! FFmpeg process handling - deadlock-free output capture
//!
//! ## Background
//!
//! Piping both stdout and stderr and reading them one after the other can
//! deadlock: once FFmpeg fills the 64KB stderr pipe buffer it blocks, while
//! we are still blocked reading stdout.
//!
//! ## Approach
//!
//! stderr is drained on its own thread while the calling thread drains
//! stdout. Both streams are returned as one combined text for diagnostics.
//!
//! ## Example
//!
//! ```ignore
//! use shared_utils::ffmpeg_process::FfmpegProcess;
//! use std::ffi::OsString;
//! use std::path::Path;
//!
//! let args: Vec<OsString> = vec!["-i".into(), "in.mov".into(), "out.mp4".into()];
//! let output = FfmpegProcess::spawn(Path::new("ffmpeg"), &args)?.wait_with_output()?;
//! if !output.success() {
//!     eprintln!("{}", output.combined);
//! }
//! ```

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::logging::log_external_tool;

/// Result of one finished engine invocation.
#[derive(Debug)]
pub struct EngineOutput {
    pub status: ExitStatus,
    /// stdout followed by stderr, lossily decoded
    pub combined: String,
    pub duration: Duration,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Running engine process whose stderr is consumed on a background thread.
pub struct FfmpegProcess {
    child: Child,
    stderr_thread: Option<JoinHandle<String>>,
    tool_name: String,
    args: Vec<OsString>,
    started: Instant,
}

impl FfmpegProcess {
    /// Start `program` with `args`.
    ///
    /// stdin is closed so that concurrent engines never compete for the
    /// terminal; stdout and stderr are piped. Arguments are passed through
    /// byte for byte, so non-UTF-8 paths reach the engine intact.
    pub fn spawn(program: &Path, args: &[OsString]) -> Result<Self> {
        let tool_name = program.display().to_string();
        debug!(tool = %tool_name, args = ?args, "Spawning external engine");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", tool_name))?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture {} stderr", tool_name))?;

        let stderr_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        });

        Ok(Self {
            child,
            stderr_thread: Some(stderr_thread),
            tool_name,
            args: args.to_vec(),
            started: Instant::now(),
        })
    }

    /// Drain stdout, wait for exit, and join the stderr reader.
    ///
    /// The child is always reaped before returning, on error too.
    pub fn wait_with_output(mut self) -> Result<EngineOutput> {
        let stdout_buf = match self.read_stdout() {
            Ok(buf) => buf,
            Err(e) => {
                self.abort();
                return Err(e).with_context(|| format!("Failed to read {} stdout", self.tool_name));
            }
        };

        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => {
                self.abort();
                return Err(e).with_context(|| format!("Failed to wait for {}", self.tool_name));
            }
        };

        let stderr = self.join_stderr();

        let mut combined = String::from_utf8_lossy(&stdout_buf).into_owned();
        combined.push_str(&stderr);

        let duration = self.started.elapsed();
        log_external_tool(&self.tool_name, &self.args, &combined, status.code(), duration);

        Ok(EngineOutput {
            status,
            combined,
            duration,
        })
    }

    fn read_stdout(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut stdout) = self.child.stdout.take() {
            stdout.read_to_end(&mut buf)?;
        }
        Ok(buf)
    }

    fn join_stderr(&mut self) -> String {
        self.stderr_thread
            .take()
            .map(|t| t.join().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Kill and reap the engine, then join the stderr reader.
    fn abort(&mut self) {
        // kill fails only when the child already exited
        let _ = self.child.kill();
        if let Err(e) = self.child.wait() {
            debug!(tool = %self.tool_name, error = %e, "Failed to reap engine");
        }
        self.join_stderr();
    }
}

/// Spawn the engine and block until it exits.
pub fn run_to_completion(program: &Path, args: &[OsString]) -> Result<EngineOutput> {
    FfmpegProcess::spawn(program, args)?.wait_with_output()
}

/// Pick the most telling line out of FFmpeg's output.
///
/// 1. the last line mentioning "Error"/"error"
/// 2. otherwise the last non-empty line that is not a progress line
/// 3. otherwise "Unknown FFmpeg error"
pub fn format_ffmpeg_error(stderr: &str) -> String {
    if let Some(error_line) = stderr
        .lines()
        .rev()
        .find(|line| line.contains("Error") || line.contains("error"))
    {
        return error_line.trim().to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("frame=")
                && !trimmed.starts_with("fps=")
                && !trimmed.starts_with("size=")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Unknown FFmpeg error".to_string())
}
