//! Builder for provisioners wired to mockall mocks
use provisioner::core::CommandOutput;
use provisioner::services::{JsonConfigStore, LayeredConfig};
use provisioner::traits::{MockCommandRunner, MockFileSystem, MockHostFactsSource, MockSleeper};
use provisioner::{CommandSpec, Provisioner};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fixtures::TestFixtures;

pub type TestProvisioner = Provisioner<LayeredConfig, MockCommandRunner, MockSleeper, MockFileSystem, MockHostFactsSource>;

/// Every command a mock runner saw, in order
pub type CommandLog = Arc<Mutex<Vec<CommandSpec>>>;

/// Builder with permissive defaults so tests only set what they check
pub struct ProvisionerBuilder {
    config: LayeredConfig,
    runner: MockCommandRunner,
    sleeper: MockSleeper,
    file_system: MockFileSystem,
    host_facts: MockHostFactsSource,
    log: CommandLog,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl ProvisionerBuilder {
    pub fn new() -> Self {
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let recorded = sleeps.clone();
        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .returning(move |duration| recorded.lock().unwrap().push(duration))
            .times(0..);

        let mut host_facts = MockHostFactsSource::new();
        host_facts
            .expect_collect()
            .returning(|hostname| Ok(TestFixtures::host_facts(hostname)))
            .times(0..);

        Self {
            config: LayeredConfig::new(),
            runner: MockCommandRunner::new(),
            sleeper,
            file_system: MockFileSystem::new(),
            host_facts,
            log: Arc::new(Mutex::new(Vec::new())),
            sleeps,
        }
    }

    /// Add a configuration layer below those already added
    pub fn with_layer(mut self, document: Value) -> Self {
        self.config = self.config.with_layer(JsonConfigStore::from_value(document));
        self
    }

    /// Answer every command through `respond`, recording it first
    pub fn with_responses<F>(mut self, respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandOutput + Send + 'static,
    {
        let log = self.log.clone();
        self.runner.expect_run().returning(move |spec| {
            log.lock().unwrap().push(spec.clone());
            Ok(respond(spec))
        });
        self
    }

    /// Configure the file system mock with a setup function
    pub fn with_file_system<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockFileSystem),
    {
        setup(&mut self.file_system);
        self
    }

    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    pub fn sleeps(&self) -> Arc<Mutex<Vec<Duration>>> {
        self.sleeps.clone()
    }

    pub fn build(self) -> TestProvisioner {
        Provisioner::new(self.config, self.runner, self.sleeper, self.file_system, self.host_facts)
    }
}

/// Descriptions of the recorded commands
pub fn descriptions(log: &CommandLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|spec| spec.description.clone()).collect()
}
