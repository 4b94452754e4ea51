use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole conversion run (exit code 1).
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Error creating output directory {}: {}", path.display(), source)]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid input files to process")]
    NoValidInputs,
}

/// Errors confined to a single job; the run carries on.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to start engine: {0:#}")]
    Spawn(anyhow::Error),

    #[error("Engine exited with {}", exit_label(*exit_code))]
    EngineFailed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Error removing existing file {}: {}", path.display(), source)]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error moving temp file {} to final location {}: {}", from.display(), to.display(), source)]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
