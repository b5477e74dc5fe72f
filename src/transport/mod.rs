//! Host abstraction — where steps actually land.
//!
//! The executor only talks to a [`Host`]. [`local::LocalHost`] mutates the
//! machine the process runs on; the test-only `recording::RecordingHost`
//! keeps an in-memory filesystem and a call log.

pub mod local;
#[cfg(test)]
pub mod recording;

use crate::core::error::ProvisionError;
use std::path::Path;

/// Output from executing a command on a host.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The three primitives a provisioning step can use.
pub trait Host {
    /// Run a shell command to completion, capturing both streams.
    ///
    /// A non-zero exit is reported in [`ExecOutput`], not as an error. `Err`
    /// means the shell itself could not be run.
    fn exec(&mut self, command: &str) -> Result<ExecOutput, ProvisionError>;

    /// Create or truncate `path` and write `content`. Parent directories are
    /// never created.
    fn write_file(&mut self, path: &Path, content: &str) -> std::io::Result<()>;

    fn read_file(&mut self, path: &Path) -> std::io::Result<String>;
}
