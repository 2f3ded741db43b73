//! Common test utilities and infrastructure
//!
//! Shared fixtures and a builder for provisioners wired to mocks.

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{CommandLog, ProvisionerBuilder};
