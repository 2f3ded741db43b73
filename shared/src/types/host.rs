//! Host identity and runtime facts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global host label - set once at startup, used to stamp log events
static HOST_LABEL: OnceLock<HostLabel> = OnceLock::new();

/// Label identifying the host a provisioning run is acting on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostLabel(String);

impl HostLabel {
    /// Initialize the global host label. Later calls keep the first value.
    pub fn init(hostname: impl Into<String>) -> &'static HostLabel {
        let hostname = hostname.into();
        HOST_LABEL.get_or_init(|| HostLabel(hostname))
    }

    /// Get the global host label, or `unknown` before initialization
    pub fn current() -> &'static HostLabel {
        static UNKNOWN: OnceLock<HostLabel> = OnceLock::new();
        HOST_LABEL
            .get()
            .unwrap_or_else(|| UNKNOWN.get_or_init(|| HostLabel("unknown".to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only facts about the machine being provisioned.
///
/// Collected from the runtime environment by the caller and passed into pure
/// functions, so derivations stay deterministic under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFacts {
    pub hostname: String,
    pub cpu_count: u32,
    /// Total physical memory, in kB
    pub total_memory_kb: u64,
    /// Mount points of local ext*/xfs filesystems
    pub local_filesystems: Vec<String>,
    /// Whether an mdadm software RAID configuration is present
    pub software_raid: bool,
}

impl HostFacts {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    pub fn total_memory_mb(&self) -> u64 {
        self.total_memory_kb / 1024
    }
}
