//! Run errors. Every variant is fatal: the process prints it and exits 1.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A fatal command exited non-zero.
    #[error("command failed (exit code {exit_code}): {command}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The shell could not be spawned or waited on.
    #[error("transport error: {0}")]
    Transport(String),

    /// A file step hit an I/O fault.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plan file could not be read, parsed, or validated.
    #[error("{0}")]
    Plan(String),
}

impl ProvisionError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
