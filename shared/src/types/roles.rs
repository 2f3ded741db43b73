//! Host roles and the file manifests attached to them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional class of a host instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Worker,
    Engage,
    Ingest,
    Database,
    AssetServer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Worker => write!(f, "worker"),
            Role::Engage => write!(f, "engage"),
            Role::Ingest => write!(f, "ingest"),
            Role::Database => write!(f, "database"),
            Role::AssetServer => write!(f, "asset_server"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "worker" => Ok(Role::Worker),
            "engage" => Ok(Role::Engage),
            "ingest" => Ok(Role::Ingest),
            "database" => Ok(Role::Database),
            "asset_server" => Ok(Role::AssetServer),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// One file to place for a role, relative to the deploy root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source_path: String,
    pub destination_path: String,
}

impl ManifestEntry {
    pub fn new(source_path: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
        }
    }
}

/// Independent role flags derived from a hostname
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    pub is_database: bool,
    pub is_engage: bool,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_and_parse() {
        for role in [
            Role::Admin,
            Role::Worker,
            Role::Engage,
            Role::Ingest,
            Role::Database,
            Role::AssetServer,
        ] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_parse_error() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("unknown_role".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::AssetServer).unwrap();
        assert_eq!(json, "\"asset_server\"");
    }
}
