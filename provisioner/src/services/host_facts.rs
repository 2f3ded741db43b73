//! Host facts gathered through `sysinfo`

use std::path::PathBuf;
use sysinfo::{Disks, System};

use crate::error::ProvisionResult;
use crate::traits::HostFactsSource;
use shared::{step_debug, HostFacts};

/// Collects facts from the running machine
#[derive(Debug, Clone)]
pub struct RealHostFacts {
    mdadm_conf_path: PathBuf,
}

impl RealHostFacts {
    pub fn new() -> Self {
        Self {
            mdadm_conf_path: PathBuf::from("/etc/mdadm/mdadm.conf"),
        }
    }

    /// Look for the software RAID configuration elsewhere (fluent API)
    pub fn with_mdadm_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.mdadm_conf_path = path.into();
        self
    }
}

impl Default for RealHostFacts {
    fn default() -> Self {
        Self::new()
    }
}

/// ext* and xfs count as local; network and virtual filesystems do not
pub fn is_local_filesystem(fs_type: &str) -> bool {
    fs_type.starts_with("ext") || fs_type == "xfs"
}

/// Mount points of local filesystems from `(mount point, fs type)` pairs,
/// first occurrence wins
pub fn local_filesystems<I>(mounts: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut found: Vec<String> = Vec::new();
    for (mount_point, fs_type) in mounts {
        if is_local_filesystem(&fs_type) && !found.contains(&mount_point) {
            found.push(mount_point);
        }
    }
    found
}

impl HostFactsSource for RealHostFacts {
    fn collect(&self, hostname: &str) -> ProvisionResult<HostFacts> {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu();

        let disks = Disks::new_with_refreshed_list();
        let mounts = disks.list().iter().map(|disk| {
            (
                disk.mount_point().to_string_lossy().into_owned(),
                disk.file_system().to_string_lossy().into_owned(),
            )
        });

        let facts = HostFacts {
            hostname: hostname.to_string(),
            cpu_count: (system.cpus().len() as u32).max(1),
            total_memory_kb: system.total_memory() / 1024,
            local_filesystems: local_filesystems(mounts),
            software_raid: self.mdadm_conf_path.exists(),
        };
        step_debug!(
            "🖥️ {} cpus, {} kB memory, local filesystems {:?}",
            facts.cpu_count,
            facts.total_memory_kb,
            facts.local_filesystems
        );
        Ok(facts)
    }
}
