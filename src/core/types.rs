//! Plan and run types.
//!
//! A provisioning plan is an ordered list of phases, each an ordered list of
//! steps. Steps are pure descriptions; nothing here touches the host. All plan
//! types derive Serialize/Deserialize so a plan can be stored as YAML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Plan
// ============================================================================

/// Root of a plan file — the full sequence for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionPlan {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Human-readable plan name
    pub name: String,

    /// Optional description, printed as the start banner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Phases, executed in order
    pub phases: Vec<Phase>,
}

impl ProvisionPlan {
    /// Iterate over every step in execution order, paired with its phase name.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &Step)> {
        self.phases
            .iter()
            .flat_map(|p| p.steps.iter().map(move |s| (p.name.as_str(), s)))
    }

    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }
}

/// A named group of steps. Grouping only affects progress output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<Step>,
}

/// A single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Run a shell command. Non-zero exit aborts the run unless `ignore_error`.
    Command {
        command: String,
        #[serde(default, skip_serializing_if = "is_false")]
        ignore_error: bool,
    },

    /// Create or truncate `path` and write `content` verbatim.
    WriteFile { path: String, content: String },

    /// Read `path`, replace every occurrence of `find` with `replace`, write it back.
    ReplaceInFile {
        path: String,
        find: String,
        replace: String,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Step {
    /// Fatal-on-error command.
    pub fn command(command: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            ignore_error: false,
        }
    }

    /// Command whose failure is reported but does not stop the run.
    pub fn tolerant(command: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            ignore_error: true,
        }
    }

    pub fn write_file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::WriteFile {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn replace_in_file(
        path: impl Into<String>,
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self::ReplaceInFile {
            path: path.into(),
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Only commands can be tolerant; file operations are always fatal.
    pub fn is_tolerant(&self) -> bool {
        matches!(
            self,
            Self::Command {
                ignore_error: true,
                ..
            }
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { command, .. } => write!(f, "run: {}", command),
            Self::WriteFile { path, .. } => write!(f, "write: {}", path),
            Self::ReplaceInFile {
                path,
                find,
                replace,
            } => write!(f, "edit: {} ({} -> {})", path, find, replace),
        }
    }
}

// ============================================================================
// Run results
// ============================================================================

/// Per-step record. Used for logging and the run summary; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RunResult {
    /// Result of a file step that completed.
    pub fn file_ok() -> Self {
        Self {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        }
    }
}

/// Outcome of a run that reached the end of the plan.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub plan: String,
    pub steps_ok: u32,
    pub steps_tolerated: u32,
    pub results: Vec<RunResult>,
    pub total_duration: Duration,
}
