//! CLI subcommands — apply, validate, init, steps.

use crate::core::error::ProvisionError;
use crate::core::types::{ProvisionPlan, RunSummary, Step};
use crate::core::{executor, parser, plan};
use crate::transport::local::LocalHost;
use crate::transport::Host;
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// File name written by `init`.
pub const PLAN_FILE: &str = "kvmhost.yaml";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision this host (the default when no subcommand is given)
    Apply {
        /// Plan file to run instead of the built-in CloudStack KVM plan
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Validate a plan file without touching the host
    Validate {
        /// Path to the plan file
        #[arg(short, long, default_value = PLAN_FILE)]
        plan: PathBuf,
    },

    /// Write the built-in plan to a directory for review or editing
    Init {
        /// Directory to write into (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the steps of a plan in execution order
    Steps {
        /// Plan file to list instead of the built-in plan
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Apply { plan: None }
    }
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), ProvisionError> {
    match cmd {
        Commands::Apply { plan } => cmd_apply(plan.as_deref()),
        Commands::Validate { plan } => cmd_validate(&plan),
        Commands::Init { path } => cmd_init(&path),
        Commands::Steps { plan } => cmd_steps(plan.as_deref()),
    }
}

/// Built-in plan, or the validated plan at `path`.
fn resolve_plan(path: Option<&Path>) -> Result<ProvisionPlan, ProvisionError> {
    match path {
        Some(p) => parser::load_plan(p),
        None => Ok(plan::cloudstack_kvm_host()),
    }
}

fn cmd_apply(path: Option<&Path>) -> Result<(), ProvisionError> {
    let plan = resolve_plan(path)?;
    let summary = apply_on(&plan, &mut LocalHost)?;
    tracing::info!(
        ok = summary.steps_ok,
        tolerated = summary.steps_tolerated,
        seconds = summary.total_duration.as_secs_f64(),
        "provisioned"
    );
    Ok(())
}

/// Run `plan` on `host` between the start and completion banners.
pub fn apply_on<H: Host + ?Sized>(
    plan: &ProvisionPlan,
    host: &mut H,
) -> Result<RunSummary, ProvisionError> {
    let title = plan.description.as_deref().unwrap_or(&plan.name);
    println!("Starting {}...", title);
    let summary = executor::run(plan, host)?;
    println!("Installation completed successfully.");
    if summary.steps_tolerated > 0 {
        println!(
            "  ({} of {} steps failed and were ignored)",
            summary.steps_tolerated,
            summary.results.len()
        );
    }
    Ok(summary)
}

fn cmd_validate(path: &Path) -> Result<(), ProvisionError> {
    let plan = parser::load_plan(path)?;
    println!(
        "OK: {} ({} phases, {} steps)",
        plan.name,
        plan.phases.len(),
        plan.step_count()
    );
    Ok(())
}

fn cmd_init(path: &Path) -> Result<(), ProvisionError> {
    let plan_path = path.join(PLAN_FILE);
    if plan_path.exists() {
        return Err(ProvisionError::Plan(format!(
            "{} already exists",
            plan_path.display()
        )));
    }

    std::fs::create_dir_all(path).map_err(|e| ProvisionError::io("cannot create", path, e))?;
    let yaml = serde_yaml_ng::to_string(&plan::cloudstack_kvm_host())
        .map_err(|e| ProvisionError::Plan(format!("YAML serialize error: {}", e)))?;
    std::fs::write(&plan_path, yaml)
        .map_err(|e| ProvisionError::io("cannot write", &plan_path, e))?;

    println!("Wrote built-in plan to {}", plan_path.display());
    println!("  Run it with: kvmhost apply --plan {}", plan_path.display());
    Ok(())
}

fn cmd_steps(path: Option<&Path>) -> Result<(), ProvisionError> {
    let plan = resolve_plan(path)?;
    print!("{}", render_steps(&plan));
    Ok(())
}

/// One line per phase, one indented line per step. `!` marks fatal steps,
/// `~` tolerant ones.
fn render_steps(plan: &ProvisionPlan) -> String {
    let mut out = format!("{} ({} steps)\n", plan.name, plan.step_count());
    let mut n = 0;
    for phase in &plan.phases {
        out.push_str(&format!("{}:\n", phase.name));
        for step in &phase.steps {
            n += 1;
            let mark = if step.is_tolerant() { "~" } else { "!" };
            out.push_str(&format!("  {:>2} {} {}\n", n, mark, step_label(step)));
        }
    }
    out
}

fn step_label(step: &Step) -> String {
    match step {
        Step::WriteFile { path, content } => format!("write: {} ({} bytes)", path, content.len()),
        other => other.to_string(),
    }
}
