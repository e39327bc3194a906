//! Child process execution with faithful exit codes.
//!
//! A child's non-zero exit is not a failure of this tool. It surfaces
//! as [`NodeupError::ProcessExitCode`], which `main` downcasts to
//! terminate with the exact same code and no extra output.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::config::runtime_bin_dir;
use crate::env::EnvOverlay;
use crate::errors::NodeupError;

/// Runs a command with a runtime activated through the overlay.
///
/// Validates that the runtime actually carries a `node` executable
/// before spawning anything.
///
/// # Errors
///
/// Returns [`NodeupError::NoCommand`] for an empty command,
/// [`NodeupError::ProcessExitCode`] for a non-zero child exit, and
/// propagates spawn failures.
pub fn run_under_runtime(
    runtime_dir: &Path,
    command: &[String],
    overlay: &EnvOverlay,
) -> Result<()> {
    let (program, args) = split_command(command)?;

    let node = runtime_bin_dir(runtime_dir).join(node_executable());
    if !node.is_file() {
        anyhow::bail!("runtime is missing its node executable: {}", node.display());
    }

    let mut cmd = Command::new(program);
    cmd.args(args);
    overlay.apply(&mut cmd);
    run(cmd, program)
}

/// Runs a command in the unmodified parent environment.
///
/// Used when the active runtime already satisfies the constraint.
///
/// # Errors
///
/// Same contract as [`run_under_runtime`].
pub fn run_directly(command: &[String]) -> Result<()> {
    let (program, args) = split_command(command)?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    run(cmd, program)
}

fn split_command(command: &[String]) -> Result<(&String, &[String])> {
    match command.split_first() {
        Some((program, args)) => Ok((program, args)),
        None => Err(NodeupError::NoCommand.into()),
    }
}

/// Spawns with inherited stdio and maps the exit status.
fn run(mut cmd: Command, program: &str) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to run command: {program}"))?;

    if status.success() {
        return Ok(());
    }

    let code = status.code().unwrap_or(1);
    Err(NodeupError::process_exit_code(code).into())
}

fn node_executable() -> &'static str {
    if cfg!(windows) {
        "node.exe"
    } else {
        "node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_a_validation_error() {
        let err = run_directly(&[]).expect_err("empty command must fail before spawning");
        let err = err
            .downcast::<NodeupError>()
            .expect("should be a typed error");
        assert!(matches!(err, NodeupError::NoCommand));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_ok() {
        run_directly(&["true".to_string()]).expect("true should exit 0");
    }

    #[cfg(unix)]
    #[test]
    fn child_exit_code_is_carried_in_the_error() {
        let err = run_directly(&[
            "sh".to_string(),
            "-c".to_string(),
            "exit 3".to_string(),
        ])
        .expect_err("exit 3 must be an error");

        let err = err
            .downcast::<NodeupError>()
            .expect("should be a typed error");
        match err {
            NodeupError::ProcessExitCode { code } => assert_eq!(code, 3),
            other => panic!("expected ProcessExitCode, got {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn runtime_without_node_is_rejected() {
        let dir = std::env::temp_dir().join(format!(
            "nodeup_test_exec_missing_{}",
            rand::random::<u64>()
        ));
        std::fs::create_dir_all(dir.join("bin")).expect("should create dir");

        let err = run_under_runtime(&dir, &["true".to_string()], &EnvOverlay::new())
            .expect_err("runtime without node must be rejected");
        assert!(format!("{err:#}").contains("node executable"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn overlay_is_visible_to_the_child() {
        let mut overlay = EnvOverlay::new();
        overlay.set("NODEUP_TEST_MARKER", "42");

        let mut cmd = Command::new("sh");
        cmd.args(["-c", "test \"$NODEUP_TEST_MARKER\" = 42"]);
        overlay.apply(&mut cmd);
        let status = cmd.status().expect("should run");
        assert!(status.success(), "child should see the overlay variable");
    }
}
