//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the provisioning logic and the machine it
//! mutates. Real implementations live in [`crate::services`]; tests use the
//! generated `Mock*` types.

use serde_json::Value;
use shared::HostFacts;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::command::{CommandOutput, CommandSpec};
use crate::error::ProvisionResult;

/// Read-only key/value configuration store
#[mockall::automock]
pub trait ConfigSource {
    /// Look up a dotted key such as `opsworks.instance.hostname`
    fn get(&self, key: &str) -> Option<Value>;
}

/// Command execution facility
///
/// Returns `Ok` with the exit status for anything that ran, including
/// non-zero exits. `Err` is reserved for commands that could not be started.
#[mockall::automock]
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandOutput>;
}

/// File system operations used by recipes
#[mockall::automock]
pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> ProvisionResult<String>;

    /// Write `contents` to `path`, creating parent directories, then apply `mode`
    fn write_file(&self, path: &Path, contents: &str, mode: u32) -> ProvisionResult<()>;

    fn create_dir_all(&self, path: &Path) -> ProvisionResult<()>;

    /// Remove a file; a missing file is not an error
    fn remove_file(&self, path: &Path) -> ProvisionResult<()>;

    /// Most recently modified directory directly under `path`
    fn newest_subdirectory(&self, path: &Path) -> ProvisionResult<Option<PathBuf>>;
}

/// Source of runtime host facts
#[mockall::automock]
pub trait HostFactsSource {
    fn collect(&self, hostname: &str) -> ProvisionResult<HostFacts>;
}

/// Blocking delay between retry attempts
#[mockall::automock]
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}
