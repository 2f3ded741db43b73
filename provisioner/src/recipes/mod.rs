//! Provisioning recipes
//!
//! Each recipe is a linear sequence of idempotent steps over a
//! [`Provisioner`](crate::Provisioner). Commands go through the retrying
//! executor; templates are returned as a [`RenderPlan`](crate::core::RenderPlan)
//! for the external rendering engine.

pub mod alarms;
pub mod database;
pub mod deploy;
pub mod networking;
pub mod nginx;
pub mod packages;

pub use deploy::DeployReport;

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    use crate::core::command::{CommandOutput, CommandSpec};
    use crate::services::JsonConfigStore;
    use crate::traits::{MockCommandRunner, MockFileSystem, MockHostFactsSource, MockSleeper};
    use crate::Provisioner;

    pub type TestProvisioner =
        Provisioner<JsonConfigStore, MockCommandRunner, MockSleeper, MockFileSystem, MockHostFactsSource>;

    /// Commands seen by a recording runner, in order
    pub type CommandLog = Arc<Mutex<Vec<CommandSpec>>>;

    /// Runner that records every command and answers with `stdout`
    pub fn recording_runner(stdout: &'static str) -> (MockCommandRunner, CommandLog) {
        let log: CommandLog = Arc::new(Mutex::new(Vec::new()));
        let seen = log.clone();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |spec| {
            seen.lock().unwrap().push(spec.clone());
            Ok(CommandOutput::success(stdout))
        });
        (runner, log)
    }

    pub fn quiet_sleeper() -> MockSleeper {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().returning(|_| ());
        sleeper
    }

    pub fn provisioner(
        config: Value,
        runner: MockCommandRunner,
        file_system: MockFileSystem,
        host_facts: MockHostFactsSource,
    ) -> TestProvisioner {
        Provisioner::new(
            JsonConfigStore::from_value(config),
            runner,
            quiet_sleeper(),
            file_system,
            host_facts,
        )
    }

    pub fn descriptions(log: &CommandLog) -> Vec<String> {
        log.lock().unwrap().iter().map(|spec| spec.description.clone()).collect()
    }
}
