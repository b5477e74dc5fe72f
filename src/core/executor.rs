//! Executor — the interpreter loop for a plan.
//!
//! Steps run strictly in order against a [`Host`]. A failing fatal step ends
//! the run with an error; a failing tolerant step is reported and skipped.
//! File faults are always fatal.

use super::error::ProvisionError;
use super::types::*;
use crate::transport::{ExecOutput, Host};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of a step that did not abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Succeeded,
    /// Tolerant command exited non-zero.
    Tolerated,
}

/// Execute every step of `plan` on `host`.
pub fn run<H: Host + ?Sized>(
    plan: &ProvisionPlan,
    host: &mut H,
) -> Result<RunSummary, ProvisionError> {
    let start = Instant::now();
    let total = plan.step_count();
    info!(plan = %plan.name, steps = total, "starting run");

    let mut results = Vec::with_capacity(total);
    let mut steps_ok = 0u32;
    let mut steps_tolerated = 0u32;

    for phase in &plan.phases {
        match &phase.description {
            Some(desc) => println!("==> {}: {}", phase.name, desc),
            None => println!("==> {}", phase.name),
        }
        info!(phase = %phase.name, steps = phase.steps.len(), "phase");

        for step in &phase.steps {
            let (outcome, result) = execute_step(step, host)?;
            match outcome {
                StepOutcome::Succeeded => steps_ok += 1,
                StepOutcome::Tolerated => steps_tolerated += 1,
            }
            results.push(result);
        }
    }

    info!(
        plan = %plan.name,
        ok = steps_ok,
        tolerated = steps_tolerated,
        seconds = start.elapsed().as_secs_f64(),
        "run complete"
    );

    Ok(RunSummary {
        plan: plan.name.clone(),
        steps_ok,
        steps_tolerated,
        results,
        total_duration: start.elapsed(),
    })
}

/// Execute one step. `Err` means the run must stop.
fn execute_step<H: Host + ?Sized>(
    step: &Step,
    host: &mut H,
) -> Result<(StepOutcome, RunResult), ProvisionError> {
    debug!(step = %step, "executing");
    match step {
        Step::Command {
            command,
            ignore_error,
        } => run_command(host, command, *ignore_error),
        Step::WriteFile { path, content } => {
            write_file(host, Path::new(path), content)?;
            Ok((StepOutcome::Succeeded, RunResult::file_ok()))
        }
        Step::ReplaceInFile {
            path,
            find,
            replace,
        } => {
            replace_in_file(host, Path::new(path), find, replace)?;
            Ok((StepOutcome::Succeeded, RunResult::file_ok()))
        }
    }
}

/// Run a command; print stdout on success, the command and stderr on failure.
fn run_command<H: Host + ?Sized>(
    host: &mut H,
    command: &str,
    ignore_error: bool,
) -> Result<(StepOutcome, RunResult), ProvisionError> {
    let out = host.exec(command)?;
    let result = to_result(&out);

    if out.success() {
        println!("{}", out.stdout);
        return Ok((StepOutcome::Succeeded, result));
    }

    eprintln!("Error running command: {}\n{}", command, out.stderr);
    if ignore_error {
        warn!(command, exit_code = out.exit_code, "tolerated failure");
        return Ok((StepOutcome::Tolerated, result));
    }

    error!(command, exit_code = out.exit_code, "fatal failure");
    Err(ProvisionError::CommandFailed {
        command: command.to_string(),
        exit_code: out.exit_code,
        stderr: out.stderr,
    })
}

fn write_file<H: Host + ?Sized>(
    host: &mut H,
    path: &Path,
    content: &str,
) -> Result<(), ProvisionError> {
    host.write_file(path, content)
        .map_err(|e| ProvisionError::io("cannot write", path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Read-modify-write. The file is written back even when `find` is absent.
fn replace_in_file<H: Host + ?Sized>(
    host: &mut H,
    path: &Path,
    find: &str,
    replace: &str,
) -> Result<(), ProvisionError> {
    let original = host
        .read_file(path)
        .map_err(|e| ProvisionError::io("cannot read", path, e))?;
    let updated = replace_all(&original, find, replace);
    if updated == original {
        debug!(path = %path.display(), find, "pattern absent, rewriting unchanged");
    }
    write_file(host, path, &updated)
}

/// Replace every occurrence of `find`. An empty `find` leaves the text alone.
pub fn replace_all(text: &str, find: &str, replace: &str) -> String {
    if find.is_empty() {
        return text.to_string();
    }
    text.replace(find, replace)
}

fn to_result(out: &ExecOutput) -> RunResult {
    RunResult {
        success: out.success(),
        stdout: out.stdout.clone(),
        stderr: out.stderr.clone(),
        exit_code: out.exit_code,
    }
}
