//! Core types used throughout the provisioning system

pub mod host;
pub mod retry;
pub mod roles;
pub mod settings;

pub use host::{HostFacts, HostLabel};
pub use retry::RetryPolicy;
pub use roles::{ManifestEntry, Role, RoleFlags};
pub use settings::{AuthInfo, DeployAction, GitSource, StorageInfo};
