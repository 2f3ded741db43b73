//! Package repository refresh and package installation
//!
//! Ubuntu mirrors are slow or flaky often enough that both steps run with a
//! timeout and several retries.

use shared::{step_info, RetryPolicy};

use crate::core::command::{apt_install, apt_update};
use crate::error::ProvisionResult;
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    pub fn update_package_repo(&self) -> ProvisionResult<()> {
        step_info!("📦 Updating package repository");
        self.executor().run_command(&apt_update(), RetryPolicy::PACKAGE_INSTALL)?;
        Ok(())
    }

    pub fn install_package(&self, name: &str) -> ProvisionResult<()> {
        step_info!("📦 Installing {}", name);
        self.executor().run_command(&apt_install(name), RetryPolicy::PACKAGE_INSTALL)?;
        Ok(())
    }

    pub fn install_packages(&self, names: &[&str]) -> ProvisionResult<()> {
        names.iter().try_for_each(|name| self.install_package(name))
    }
}
