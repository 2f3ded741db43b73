//! Host provisioning for the media-processing cluster
//!
//! Configuration resolution with defaults, bounded retries around external
//! commands, and the recipes built on them: package installs, monitoring
//! alarms, nginx, mysql credentials and application deploys.

pub mod core;
pub mod error;
pub mod executor;
pub mod provisioner;
pub mod recipes;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use core::{CommandOutput, CommandSpec, RenderPlan, Resolver, TemplateRequest};
pub use error::{ProvisionError, ProvisionResult};
pub use executor::{execute_with_retry, RetryError, RetryExecutor, RetryState};
pub use provisioner::Provisioner;
pub use recipes::DeployReport;
pub use traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
