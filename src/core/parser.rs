//! YAML plan files: parsing and structural validation.
//!
//! Validation rules:
//! - Version must be "1.0"
//! - Plan and phase names non-empty, phase names unique
//! - Every phase has at least one step
//! - Commands non-blank, file paths absolute, `find` non-empty

use super::error::ProvisionError;
use super::types::*;
use std::collections::HashSet;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a plan file from disk.
pub fn parse_plan_file(path: &Path) -> Result<ProvisionPlan, ProvisionError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProvisionError::Plan(format!("failed to read {}: {}", path.display(), e)))?;
    parse_plan(&content)
}

/// Parse a plan from a YAML string.
pub fn parse_plan(yaml: &str) -> Result<ProvisionPlan, ProvisionError> {
    serde_yaml_ng::from_str(yaml).map_err(|e| ProvisionError::Plan(format!("YAML parse error: {}", e)))
}

/// Validate a parsed plan. Returns a list of errors (empty = valid).
pub fn validate_plan(plan: &ProvisionPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |message: String| errors.push(ValidationError { message });

    if plan.version != "1.0" {
        push(format!("version must be \"1.0\", got \"{}\"", plan.version));
    }
    if plan.name.trim().is_empty() {
        push("name must not be empty".to_string());
    }
    if plan.phases.is_empty() {
        push("plan has no phases".to_string());
    }

    let mut seen = HashSet::new();
    for (i, phase) in plan.phases.iter().enumerate() {
        let label = if phase.name.trim().is_empty() {
            push(format!("phase #{} has an empty name", i + 1));
            format!("#{}", i + 1)
        } else {
            phase.name.clone()
        };
        if !phase.name.is_empty() && !seen.insert(phase.name.as_str()) {
            push(format!("duplicate phase '{}'", phase.name));
        }
        if phase.steps.is_empty() {
            push(format!("phase '{}' has no steps", label));
        }

        for (j, step) in phase.steps.iter().enumerate() {
            let at = format!("phase '{}' step {}", label, j + 1);
            match step {
                Step::Command { command, .. } => {
                    if command.trim().is_empty() {
                        push(format!("{}: command is empty", at));
                    }
                }
                Step::WriteFile { path, .. } => {
                    if !Path::new(path).is_absolute() {
                        push(format!("{}: path '{}' is not absolute", at, path));
                    }
                }
                Step::ReplaceInFile { path, find, .. } => {
                    if !Path::new(path).is_absolute() {
                        push(format!("{}: path '{}' is not absolute", at, path));
                    }
                    if find.is_empty() {
                        push(format!("{}: find must not be empty", at));
                    }
                }
            }
        }
    }

    errors
}

/// Parse and validate a plan file, printing each validation error.
pub fn load_plan(path: &Path) -> Result<ProvisionPlan, ProvisionError> {
    let plan = parse_plan_file(path)?;
    let errors = validate_plan(&plan);
    if errors.is_empty() {
        return Ok(plan);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err(ProvisionError::Plan(format!(
        "{}: {} validation error(s)",
        path.display(),
        errors.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(plan: &ProvisionPlan) -> Vec<String> {
        validate_plan(plan).into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_parse_valid() {
        let yaml = r#"
version: "1.0"
name: lab
phases:
  - name: base
    steps:
      - type: command
        command: yum install -y chrony
      - type: write_file
        path: /etc/motd
        content: "managed\n"
"#;
        let plan = parse_plan(yaml).unwrap();
        assert_eq!(plan.name, "lab");
        assert_eq!(plan.step_count(), 2);
        assert!(messages(&plan).is_empty(), "unexpected errors: {:?}", messages(&plan));
    }

    #[test]
    fn test_builtin_plan_is_valid() {
        let plan = crate::core::plan::cloudstack_kvm_host();
        assert!(messages(&plan).is_empty());
    }

    #[test]
    fn test_bad_version() {
        let plan = parse_plan("version: \"2.0\"\nname: t\nphases: []\n").unwrap();
        let errs = messages(&plan);
        assert!(errs.iter().any(|e| e.contains("version")));
        assert!(errs.iter().any(|e| e.contains("no phases")));
    }

    #[test]
    fn test_duplicate_and_empty_phase() {
        let yaml = r#"
version: "1.0"
name: t
phases:
  - name: net
    steps:
      - type: command
        command: systemctl restart network
  - name: net
    steps: []
  - name: ""
    steps:
      - type: command
        command: "   "
"#;
        let errs = messages(&parse_plan(yaml).unwrap());
        assert!(errs.iter().any(|e| e == "duplicate phase 'net'"));
        assert!(errs.iter().any(|e| e == "phase 'net' has no steps"));
        assert!(errs.iter().any(|e| e == "phase #3 has an empty name"));
        assert!(errs.iter().any(|e| e == "phase '#3' step 1: command is empty"));
    }

    #[test]
    fn test_relative_paths_rejected() {
        let yaml = r#"
version: "1.0"
name: t
phases:
  - name: files
    steps:
      - type: write_file
        path: etc/motd
        content: x
      - type: replace_in_file
        path: selinux/config
        find: ""
        replace: y
"#;
        let errs = messages(&parse_plan(yaml).unwrap());
        assert!(errs.iter().any(|e| e.contains("'etc/motd' is not absolute")));
        assert!(errs.iter().any(|e| e.contains("'selinux/config' is not absolute")));
        assert!(errs.iter().any(|e| e.contains("find must not be empty")));
    }

    #[test]
    fn test_unknown_step_type() {
        let yaml = r#"
version: "1.0"
name: t
phases:
  - name: p
    steps:
      - type: reboot
"#;
        assert!(matches!(parse_plan(yaml), Err(ProvisionError::Plan(_))));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_plan("not: [valid: yaml: {{").is_err());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kvmhost.yaml");
        std::fs::write(
            &path,
            "version: \"1.0\"\nname: file-test\nphases:\n  - name: p\n    steps:\n      - type: command\n        command: \"true\"\n",
        )
        .unwrap();
        let plan = load_plan(&path).unwrap();
        assert_eq!(plan.name, "file-test");
    }

    #[test]
    fn test_load_plan_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kvmhost.yaml");
        std::fs::write(&path, "version: \"1.0\"\nname: t\nphases: []\n").unwrap();
        let err = load_plan(&path).unwrap_err();
        assert!(err.to_string().contains("1 validation error(s)"));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_plan_file(Path::new("/nonexistent/kvmhost.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
