//! Local host: commands through `bash`, files through `std::fs`.

use super::{ExecOutput, Host};
use crate::core::error::ProvisionError;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Execute a single command line locally via `bash -c`.
/// Each step is one line, so stdin is closed rather than used to carry the script.
pub fn exec_local(command: &str) -> Result<ExecOutput, String> {
    let output = Command::new("bash")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| format!("failed to spawn bash: {}", e))?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// The machine this process runs on. Needs root for the built-in plan.
#[derive(Debug, Default)]
pub struct LocalHost;

impl Host for LocalHost {
    fn exec(&mut self, command: &str) -> Result<ExecOutput, ProvisionError> {
        exec_local(command).map_err(ProvisionError::Transport)
    }

    fn write_file(&mut self, path: &Path, content: &str) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }

    fn read_file(&mut self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}
