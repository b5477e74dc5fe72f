//! In-memory host that records every call instead of touching the machine.

use super::{ExecOutput, Host};
use crate::core::error::ProvisionError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// One primitive invoked on a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Exec(String),
    Write(PathBuf),
    Read(PathBuf),
}

/// Fake host: every command succeeds with empty output unless scripted to
/// fail, and files live in a map.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub files: BTreeMap<PathBuf, String>,
    failures: HashMap<String, ExecOutput>,
    read_only: HashSet<PathBuf>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `exit_code` and print `stderr`.
    pub fn fail_command(&mut self, command: &str, exit_code: i32, stderr: &str) -> &mut Self {
        self.failures.insert(
            command.to_string(),
            ExecOutput {
                exit_code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    pub fn deny_write(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.read_only.insert(path.into());
        self
    }

    pub fn seed_file(&mut self, path: impl Into<PathBuf>, content: &str) -> &mut Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    /// Commands executed so far, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Exec(cmd) => Some(cmd.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(Path::new(path)).map(String::as_str)
    }
}

impl Host for RecordingHost {
    fn exec(&mut self, command: &str) -> Result<ExecOutput, ProvisionError> {
        self.calls.push(HostCall::Exec(command.to_string()));
        Ok(self.failures.get(command).cloned().unwrap_or(ExecOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }))
    }

    fn write_file(&mut self, path: &Path, content: &str) -> io::Result<()> {
        self.calls.push(HostCall::Write(path.to_path_buf()));
        if self.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&mut self, path: &Path) -> io::Result<String> {
        self.calls.push(HostCall::Read(path.to_path_buf()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file or directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_defaults_to_success() {
        let mut host = RecordingHost::new();
        let out = host.exec("systemctl start chronyd").unwrap();
        assert!(out.success());
        assert_eq!(host.commands(), vec!["systemctl start chronyd"]);
    }

    #[test]
    fn test_recording_scripted_failure() {
        let mut host = RecordingHost::new();
        host.fail_command("setenforce 0", 1, "SELinux is disabled");
        let out = host.exec("setenforce 0").unwrap();
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.stderr, "SELinux is disabled");
        assert!(host.exec("setenforce 1").unwrap().success());
    }

    #[test]
    fn test_recording_files() {
        let mut host = RecordingHost::new();
        host.seed_file("/etc/a", "old");
        assert_eq!(host.read_file(Path::new("/etc/a")).unwrap(), "old");
        host.write_file(Path::new("/etc/a"), "new").unwrap();
        assert_eq!(host.file("/etc/a"), Some("new"));
        let err = host.read_file(Path::new("/etc/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(
            host.calls,
            vec![
                HostCall::Read(PathBuf::from("/etc/a")),
                HostCall::Write(PathBuf::from("/etc/a")),
                HostCall::Read(PathBuf::from("/etc/b")),
            ]
        );
    }

    #[test]
    fn test_recording_deny_write() {
        let mut host = RecordingHost::new();
        host.deny_write("/etc/selinux/config");
        let err = host
            .write_file(Path::new("/etc/selinux/config"), "x")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(host.file("/etc/selinux/config").is_none());
    }
}
