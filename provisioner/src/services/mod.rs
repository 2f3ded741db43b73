//! Service implementations
//!
//! This module contains real implementations of all service traits.
//! These are the production implementations that touch the machine.

pub mod command_runner;
pub mod config_store;
pub mod file_system;
pub mod host_facts;
pub mod sleeper;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use command_runner::{DryRunCommandRunner, RealCommandRunner};
pub use config_store::{JsonConfigStore, LayeredConfig};
pub use file_system::RealFileSystem;
pub use host_facts::RealHostFacts;
pub use sleeper::ThreadSleeper;
