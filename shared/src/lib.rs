//! Shared types for the host provisioning system
//!
//! Contains the data model shared between the provisioning library and its
//! binary: roles, manifests, retry policies, host facts and logging setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
