//! SR-IOV enhanced networking driver

use shared::step_info;
use std::path::Path;

use crate::core::command::enhanced_networking;
use crate::error::ProvisionResult;
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

pub const SCRIPT_NAME: &str = "enable_enhanced_networking.sh";
pub const SCRIPT_PATH: &str = "/usr/local/bin/enable_enhanced_networking.sh";

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    /// Install the ixgbevf driver; the script is a no-op when the version already matches
    pub fn enable_enhanced_networking(&self, files_dir: &Path) -> ProvisionResult<()> {
        self.install_package("dkms")?;

        let bucket_name = self.resolver().shared_asset_bucket_name();
        let driver_version = self.resolver().ixgbevf_version();

        let script = self.file_system().read_to_string(&files_dir.join(SCRIPT_NAME))?;
        let script_path = Path::new(SCRIPT_PATH);
        self.file_system().write_file(script_path, &script, 0o700)?;

        step_info!("🔌 Enabling enhanced networking with ixgbevf {}", driver_version);
        self.executor()
            .run_once(&enhanced_networking(script_path, &driver_version, &bucket_name))?;
        Ok(())
    }
}
