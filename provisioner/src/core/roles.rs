//! Role classification, file manifests and sizing rules

use shared::{ManifestEntry, Role, RoleFlags};

const EMAIL_ERROR_DETAILS: (&str, &str) = ("dce-config/email/errorDetails", "etc/email/errorDetails");
const EMAIL_EVENT_DETAILS: (&str, &str) = ("dce-config/email/eventDetails", "etc/email/eventDetails");
const EMAIL_METASYNCH_DETAILS: (&str, &str) = ("dce-config/email/metasynchDetails", "etc/email/metasynchDetails");
const PAX_LOGGING: (&str, &str) = (
    "dce-config/services/org.ops4j.pax.logging.properties",
    "etc/services/org.ops4j.pax.logging.properties",
);
const H264_ENCODING: (&str, &str) = (
    "dce-config/encoding/DCE-h264-movies.properties",
    "etc/encoding/DCE-h264-movies.properties",
);
const ERROR_HANDLER_WORKFLOW: (&str, &str) = (
    "dce-config/workflows/DCE-error-handler.xml",
    "etc/workflows/DCE-error-handler.xml",
);

const ADMIN_FILES: &[(&str, &str)] = &[
    EMAIL_ERROR_DETAILS,
    EMAIL_EVENT_DETAILS,
    EMAIL_METASYNCH_DETAILS,
    PAX_LOGGING,
];

const WORKER_FILES: &[(&str, &str)] = &[
    EMAIL_ERROR_DETAILS,
    EMAIL_EVENT_DETAILS,
    EMAIL_METASYNCH_DETAILS,
    H264_ENCODING,
    ERROR_HANDLER_WORKFLOW,
    PAX_LOGGING,
];

const ENGAGE_FILES: &[(&str, &str)] = &[
    EMAIL_ERROR_DETAILS,
    EMAIL_EVENT_DETAILS,
    EMAIL_METASYNCH_DETAILS,
    ERROR_HANDLER_WORKFLOW,
    PAX_LOGGING,
];

/// Minimum and default JVM heap for the application daemon
pub const MIN_JAVA_XMX_MB: u64 = 4096;

/// Derive role flags from a hostname by case-sensitive prefix match
pub fn classify_host(hostname: &str) -> RoleFlags {
    RoleFlags {
        is_database: hostname.starts_with("db-master"),
        is_engage: hostname.starts_with("engage"),
        is_admin: hostname.starts_with("admin"),
    }
}

/// Memory alarm threshold in percent.
///
/// Database hosts hand most of their memory to mysql, so they alarm later.
pub fn memory_limit_percent(is_database: bool) -> u32 {
    if is_database {
        95
    } else {
        80
    }
}

/// Five-minute load average threshold
pub fn load_limit(cpu_count: u32) -> f64 {
    f64::from(cpu_count) * 1.5
}

/// JVM heap size in MB: a third of RAM when auto-sizing, never below 4096
pub fn java_xmx_ram_mb(total_memory_kb: u64, auto_configure: bool) -> u64 {
    if !auto_configure {
        return MIN_JAVA_XMX_MB;
    }
    let total_mb = total_memory_kb / 1024;
    (total_mb / 3).max(MIN_JAVA_XMX_MB)
}

/// Static file-placement list for a role name; empty for unknown roles
pub fn resolve_role_manifest(role: &str) -> Vec<ManifestEntry> {
    match role.parse::<Role>() {
        Ok(role) => manifest_for(role),
        Err(_) => Vec::new(),
    }
}

/// Static file-placement list for a role
pub fn manifest_for(role: Role) -> Vec<ManifestEntry> {
    let files: &[(&str, &str)] = match role {
        Role::Admin => ADMIN_FILES,
        Role::Worker => WORKER_FILES,
        Role::Engage => ENGAGE_FILES,
        Role::Ingest | Role::Database | Role::AssetServer => &[],
    };
    files
        .iter()
        .map(|(src, dest)| ManifestEntry::new(*src, *dest))
        .collect()
}

/// Maven profiles to build for a role, if it builds the application at all
pub fn maven_build_profiles(role: &str) -> Option<&'static str> {
    match role.parse::<Role>().ok()? {
        Role::Admin => Some("admin,dist-stub,engage-stub,worker-stub,workspace,serviceregistry"),
        Role::Ingest => Some("ingest-standalone"),
        Role::Worker => Some("worker-standalone,serviceregistry,workspace"),
        Role::Engage => Some("engage-standalone,dist,serviceregistry,workspace"),
        Role::Database | Role::AssetServer => None,
    }
}
