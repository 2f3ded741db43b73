//! Provisioning context
//!
//! Bundles the configuration resolver, the retrying command executor and the
//! machine-facing services a recipe run needs. Recipes are implemented on this
//! type in [`crate::recipes`].

use shared::{step_debug, HostFacts};

use crate::{
    core::Resolver,
    error::ProvisionResult,
    executor::RetryExecutor,
    traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper},
};

/// One host's provisioning run with injected dependencies
pub struct Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    resolver: Resolver<C>,
    executor: RetryExecutor<R, S>,
    file_system: F,
    host_facts: H,
}

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    /// Create a provisioner over an owned configuration snapshot
    pub fn new(config: C, runner: R, sleeper: S, file_system: F, host_facts: H) -> Self {
        Self {
            resolver: Resolver::new(config),
            executor: RetryExecutor::new(runner, sleeper),
            file_system,
            host_facts,
        }
    }

    pub fn resolver(&self) -> &Resolver<C> {
        &self.resolver
    }

    pub fn executor(&self) -> &RetryExecutor<R, S> {
        &self.executor
    }

    pub fn file_system(&self) -> &F {
        &self.file_system
    }

    /// Facts for the host named in the configuration
    pub fn collect_host_facts(&self) -> ProvisionResult<HostFacts> {
        let hostname = self.resolver.hostname();
        let facts = self.host_facts.collect(&hostname)?;
        step_debug!(
            "🖥️ {} has {} cpu(s), {} MB RAM, {} local filesystem(s)",
            facts.hostname,
            facts.cpu_count,
            facts.total_memory_mb(),
            facts.local_filesystems.len()
        );
        Ok(facts)
    }
}
