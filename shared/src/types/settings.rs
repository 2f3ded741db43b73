//! Structured settings resolved from node attributes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested deploy action; anything unrecognized falls back to `Deploy`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployAction {
    #[default]
    Deploy,
    ForceDeploy,
    Rollback,
}

impl DeployAction {
    /// Parse leniently: unknown actions map to `Deploy`
    pub fn from_requested(requested: &str) -> Self {
        match requested {
            "force_deploy" => DeployAction::ForceDeploy,
            "rollback" => DeployAction::Rollback,
            _ => DeployAction::Deploy,
        }
    }
}

impl fmt::Display for DeployAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployAction::Deploy => write!(f, "deploy"),
            DeployAction::ForceDeploy => write!(f, "force_deploy"),
            DeployAction::Rollback => write!(f, "rollback"),
        }
    }
}

/// User/password pair for digest-authenticated endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub user: String,
    pub pass: String,
}

impl AuthInfo {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

/// Shared storage layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(default)]
    pub shared_storage_root: Option<String>,
    #[serde(default)]
    pub export_root: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub layer_shortname: Option<String>,
}

impl Default for StorageInfo {
    fn default() -> Self {
        Self {
            shared_storage_root: Some("/var/tmp".to_string()),
            export_root: Some("/var/tmp".to_string()),
            network: Some("10.0.0.0/8".to_string()),
            layer_shortname: Some("storage".to_string()),
        }
    }
}

/// Application source repository, optionally with basic-auth credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    pub repository: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_action_lenient_parse() {
        assert_eq!(DeployAction::from_requested("rollback"), DeployAction::Rollback);
        assert_eq!(DeployAction::from_requested("force_deploy"), DeployAction::ForceDeploy);
        assert_eq!(DeployAction::from_requested("explode"), DeployAction::Deploy);
        assert_eq!(DeployAction::from_requested(""), DeployAction::Deploy);
    }

    #[test]
    fn test_storage_info_partial_document() {
        let info: StorageInfo = serde_json::from_str(r#"{"export_root": "/mnt/export"}"#).unwrap();
        assert_eq!(info.shared_storage_root, None);
        assert_eq!(info.export_root.as_deref(), Some("/mnt/export"));
    }
}
