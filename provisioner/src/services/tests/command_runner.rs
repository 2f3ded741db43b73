//! Tests for the real and dry-run command runners
//!
//! These spawn small coreutils programs, so they only run on unix hosts.

use std::time::{Duration, Instant};

use crate::core::command::CommandSpec;
use crate::error::ProvisionError;
use crate::services::command_runner::{DryRunCommandRunner, RealCommandRunner};
use crate::traits::CommandRunner;

#[cfg(unix)]
#[test]
fn test_captures_stdout_and_exit_status() {
    let runner = RealCommandRunner::new();
    let output = runner
        .run(&CommandSpec::new("echo", "echo").args(["hello", "world"]))
        .unwrap();
    assert!(output.is_success());
    assert_eq!(output.stdout.trim(), "hello world");
}

#[cfg(unix)]
#[test]
fn test_non_zero_exit_is_reported_not_raised() {
    let runner = RealCommandRunner::new();
    let output = runner.run(&CommandSpec::new("false", "false")).unwrap();
    assert!(!output.is_success());
    assert_eq!(output.status, Some(1));
}

#[cfg(unix)]
#[test]
fn test_env_and_cwd_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let runner = RealCommandRunner::new();

    let env_output = runner
        .run(&CommandSpec::new("printenv", "printenv").arg("PROVISION_TEST_VAR").env("PROVISION_TEST_VAR", "42"))
        .unwrap();
    assert_eq!(env_output.stdout.trim(), "42");

    let cwd_output = runner.run(&CommandSpec::new("pwd", "pwd").cwd(dir.path())).unwrap();
    let reported = std::fs::canonicalize(cwd_output.stdout.trim()).unwrap();
    assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
}

#[cfg(unix)]
#[test]
fn test_arguments_are_not_shell_interpreted() {
    let runner = RealCommandRunner::new();
    let output = runner
        .run(&CommandSpec::new("echo", "echo").arg("$HOME; echo injected"))
        .unwrap();
    assert_eq!(output.stdout.trim(), "$HOME; echo injected");
}

#[cfg(unix)]
#[test]
fn test_timeout_kills_command() {
    let runner = RealCommandRunner::new();
    let output = runner
        .run(&CommandSpec::new("sleep", "sleep").arg("5").timeout(Duration::from_millis(200)))
        .unwrap();
    assert_eq!(output.status, None);
    assert!(output.stderr.contains("timed out"));
}

#[cfg(unix)]
#[test]
fn test_timeout_is_not_held_up_by_grandchildren() {
    let runner = RealCommandRunner::new();
    let started = Instant::now();
    let output = runner
        .run(&CommandSpec::new("slow shell", "sh").args(["-c", "sleep 4; true"]).timeout(Duration::from_millis(200)))
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
    assert_eq!(output.status, None);
    assert!(output.stderr.contains("timed out"));
}

#[cfg(unix)]
#[test]
fn test_timeout_gives_up_on_pipes_held_outside_the_group() {
    let runner = RealCommandRunner::new();
    let started = Instant::now();
    // setsid moves the sleeper into its own session, out of reach of the group kill
    let output = runner
        .run(
            &CommandSpec::new("detached sleeper", "sh")
                .args(["-c", "setsid sleep 4 & sleep 4"])
                .timeout(Duration::from_millis(200)),
        )
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
    assert_eq!(output.status, None);
}

#[test]
fn test_missing_program_is_spawn_failure() {
    let runner = RealCommandRunner::new();
    let result = runner.run(&CommandSpec::new("ghost", "definitely-not-a-real-program-xyz"));
    assert!(matches!(result, Err(ProvisionError::SpawnFailed { .. })));
}

#[test]
fn test_dry_run_always_succeeds() {
    let runner = DryRunCommandRunner;
    let output = runner
        .run(&CommandSpec::new("dangerous", "rm").args(["-rf", "/"]))
        .unwrap();
    assert!(output.is_success());
    assert!(output.stdout.is_empty());
}
