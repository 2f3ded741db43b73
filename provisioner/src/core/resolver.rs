//! Configuration resolution with defaults
//!
//! Every lookup carries its own default: a missing key, an explicit `null` or
//! a value of the wrong shape all resolve to that default. Nothing in here
//! returns an error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::{step_info, step_warn, AuthInfo, DeployAction, GitSource, RoleFlags, StorageInfo};

use super::alarms::{alarm_name_prefix, sanitize_topic_name};
use super::media::{effective_media_download_url, media_download_domain, media_source, MediaSource};
use super::roles::classify_host;
use crate::traits::ConfigSource;

pub const DEFAULT_SHARED_ASSET_BUCKET: &str = "mh-opsworks-shared-assets";
pub const DEFAULT_SEED_FILE: &str = "cluster_seed.tgz";
pub const DEFAULT_DB_SEED_FILE: &str = "dce-config/docs/scripts/ddl/mysql5.sql";
pub const DEFAULT_LIVE_STREAM_NAME: &str = "#{caName}-#{flavor}.stream-#{resolution}_1_200@";
pub const DEFAULT_LIVE_STREAMING_URL: &str = "rtmp://example.com/streaming_url";
pub const DEFAULT_WORKSPACE_ROOT: &str = "/var/matterhorn-workspace";
pub const DEFAULT_LOG_DIRECTORY: &str = "/var/log/matterhorn";
pub const DEFAULT_EMAIL_SENDER: &str = "no-reply@localhost";
pub const DEFAULT_IXGBEVF_VERSION: &str = "2.16.1";
pub const DEFAULT_AUTH_HOST: &str = "example.com";
pub const DEFAULT_AUTH_REDIRECT_LOCATION: &str = "http://example.com/some/url";
pub const DEFAULT_USER_TRACKING_AUTHHOST: &str = "http://example.com";

/// Resolves deployment settings from a read-only configuration source
pub struct Resolver<C> {
    source: C,
}

impl<C: ConfigSource> Resolver<C> {
    pub fn new(source: C) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Raw lookup; an explicit `null` counts as absent
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.source.get(key).filter(|value| !value.is_null())
    }

    /// Stored value for `key` if present and of type `T`, else `default`
    pub fn resolve<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.resolve_optional(key).unwrap_or(default)
    }

    /// Stored value for `key` if present and of type `T`
    pub fn resolve_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lookup(key)?;
        match serde_json::from_value(value) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                step_warn!("⚠️ Ignoring malformed value for '{}': {}", key, e);
                None
            }
        }
    }

    /// Present and neither `false` nor `null`
    pub fn is_truthy(&self, key: &str) -> bool {
        !matches!(self.lookup(key), None | Some(Value::Bool(false)))
    }

    pub fn hostname(&self) -> String {
        self.resolve("opsworks.instance.hostname", String::new())
    }

    pub fn role_flags(&self) -> RoleFlags {
        classify_host(&self.hostname())
    }

    pub fn shared_asset_bucket_name(&self) -> String {
        self.resolve("shared_asset_bucket_name", DEFAULT_SHARED_ASSET_BUCKET.to_string())
    }

    pub fn seed_file(&self) -> String {
        self.resolve("cluster_seed_file", DEFAULT_SEED_FILE.to_string())
    }

    pub fn db_seed_file(&self) -> String {
        self.resolve("db_seed_file", DEFAULT_DB_SEED_FILE.to_string())
    }

    pub fn ixgbevf_version(&self) -> String {
        self.resolve("ixgbevf_version", DEFAULT_IXGBEVF_VERSION.to_string())
    }

    pub fn testing_cluster(&self) -> bool {
        let cluster_env: String = self.resolve("cluster_env", String::new());
        matches!(cluster_env.as_str(), "development" | "test")
    }

    pub fn deploy_action(&self) -> DeployAction {
        let requested: String = self.resolve("deploy_action", "deploy".to_string());
        step_info!("requested_action: {}", requested);
        DeployAction::from_requested(&requested)
    }

    pub fn live_stream_name(&self) -> String {
        self.resolve("live_stream_name", DEFAULT_LIVE_STREAM_NAME.to_string())
    }

    pub fn live_streaming_url(&self) -> String {
        self.resolve("live_streaming_url", DEFAULT_LIVE_STREAMING_URL.to_string())
    }

    /// First instance of an OpsWorks layer, as `(private hostname, attributes)`
    pub fn first_instance(&self, layer: &str) -> Option<(String, Map<String, Value>)> {
        let instances: Map<String, Value> = self.resolve_optional(&format!("opsworks.layers.{layer}.instances"))?;
        let (name, attributes) = instances.into_iter().next()?;
        match attributes {
            Value::Object(attributes) => Some((name, attributes)),
            _ => Some((name, Map::new())),
        }
    }

    fn first_instance_attribute(&self, layer: &str, attribute: &str) -> Option<String> {
        let (_, attributes) = self.first_instance(layer)?;
        attributes.get(attribute)?.as_str().map(str::to_string)
    }

    pub fn public_engage_hostname(&self) -> String {
        self.resolve_optional("public_engage_hostname")
            .or_else(|| self.first_instance_attribute("engage", "public_dns_name"))
            .unwrap_or_default()
    }

    pub fn public_engage_hostname_on_engage(&self) -> String {
        self.resolve_optional("public_engage_hostname")
            .unwrap_or_else(|| self.resolve("opsworks.instance.public_dns_name", String::new()))
    }

    pub fn public_admin_hostname(&self) -> String {
        self.resolve_optional("public_admin_hostname")
            .or_else(|| self.first_instance_attribute("admin", "public_dns_name"))
            .unwrap_or_default()
    }

    pub fn public_admin_hostname_on_admin(&self) -> String {
        self.resolve_optional("public_admin_hostname")
            .unwrap_or_else(|| self.resolve("opsworks.instance.public_dns_name", String::new()))
    }

    pub fn public_engage_ip(&self) -> Option<String> {
        self.first_instance_attribute("engage", "ip")
    }

    pub fn public_admin_ip(&self) -> Option<String> {
        self.first_instance_attribute("admin", "ip")
    }

    /// Private hostname of the first admin instance
    pub fn private_admin_hostname(&self) -> Option<String> {
        self.first_instance("admin").map(|(name, _)| name)
    }

    pub fn using_asset_server(&self) -> bool {
        self.first_instance("asset_server").is_some()
    }

    pub fn public_asset_server_hostname(&self) -> Option<String> {
        self.first_instance_attribute("asset_server", "public_dns_name")
    }

    pub fn using_ssl_for_engage(&self) -> bool {
        self.is_truthy("ssl")
    }

    pub fn cloudfront_url(&self) -> Option<String> {
        self.resolve_optional("cloudfront_url")
    }

    /// Media download base URL.
    ///
    /// `engage_hostname` is passed in because the engage instance's own
    /// attributes are not yet visible while it is being deployed.
    pub fn base_media_download_url(&self, engage_hostname: &str) -> String {
        let cloudfront_url = self.cloudfront_url();
        let asset_server_host = if self.using_asset_server() {
            self.public_asset_server_hostname()
        } else {
            None
        };

        match media_source(cloudfront_url.as_deref(), asset_server_host.as_deref()) {
            MediaSource::Cloudfront => {
                step_info!("Cloudfront url: {}", cloudfront_url.as_deref().unwrap_or_default());
            }
            MediaSource::AssetServer => {
                step_info!("asset server url: {}", asset_server_host.as_deref().unwrap_or_default());
            }
            MediaSource::Engage => {
                step_info!("engage server: {}", engage_hostname);
            }
        }

        effective_media_download_url(
            cloudfront_url.as_deref(),
            asset_server_host.as_deref(),
            engage_hostname,
            self.using_ssl_for_engage(),
        )
    }

    pub fn base_media_download_domain(&self, engage_hostname: &str) -> Option<String> {
        media_download_domain(&self.base_media_download_url(engage_hostname))
    }

    pub fn admin_user_info(&self) -> AuthInfo {
        self.resolve("admin_auth", AuthInfo::new("admin", "password"))
    }

    pub fn rest_auth_info(&self) -> AuthInfo {
        self.resolve("rest_auth", AuthInfo::new("user", "pass"))
    }

    pub fn storage_info(&self) -> StorageInfo {
        self.resolve("storage", StorageInfo::default())
    }

    pub fn shared_storage_root(&self) -> String {
        let storage = self.storage_info();
        storage
            .shared_storage_root
            .or(storage.export_root)
            .unwrap_or_else(|| "/var/tmp".to_string())
    }

    pub fn local_workspace_root(&self) -> String {
        self.resolve("local_workspace_root", DEFAULT_WORKSPACE_ROOT.to_string())
    }

    pub fn log_directory(&self) -> String {
        self.resolve("matterhorn_log_directory", DEFAULT_LOG_DIRECTORY.to_string())
    }

    pub fn auto_configure_java_xmx_memory(&self) -> bool {
        self.resolve("auto_configure_java_xmx_memory", false)
    }

    pub fn smtp_default_sender(&self) -> String {
        self.resolve("smtp_auth.default_email_sender", DEFAULT_EMAIL_SENDER.to_string())
    }

    pub fn auth_host(&self) -> String {
        self.resolve("auth_host", DEFAULT_AUTH_HOST.to_string())
    }

    pub fn auth_redirect_location(&self) -> String {
        self.resolve("auth_redirect_location", DEFAULT_AUTH_REDIRECT_LOCATION.to_string())
    }

    /// Passed to the auth service verbatim, so it stays a string
    pub fn auth_activated(&self) -> String {
        match self.lookup("auth_activated") {
            Some(Value::Bool(activated)) => activated.to_string(),
            Some(Value::String(activated)) => activated,
            _ => "true".to_string(),
        }
    }

    pub fn user_tracking_authhost(&self) -> String {
        self.resolve("user_tracking_authhost", DEFAULT_USER_TRACKING_AUTHHOST.to_string())
    }

    /// Stack name made safe for SNS topic and alarm names
    pub fn topic_name(&self) -> String {
        sanitize_topic_name(&self.resolve::<String>("opsworks.stack.name", String::new()))
    }

    pub fn short_stack_name(&self) -> String {
        self.topic_name()
    }

    pub fn alarm_name_prefix(&self) -> String {
        alarm_name_prefix(&self.topic_name(), &self.hostname())
    }

    pub fn stack_and_hostname(&self) -> String {
        self.alarm_name_prefix()
    }

    pub fn aws_instance_id(&self) -> String {
        self.resolve("opsworks.instance.aws_instance_id", String::new())
    }

    pub fn private_dns_name(&self) -> String {
        self.resolve("opsworks.instance.private_dns_name", String::new())
    }
}

/// Clone URL for a repository, embedding basic-auth credentials when a user is set
pub fn git_repo_url(git: &GitSource) -> String {
    match &git.user {
        Some(user) => {
            let repository = git
                .repository
                .strip_prefix("https://")
                .or_else(|| git.repository.strip_prefix("http://"))
                .unwrap_or(&git.repository);
            let password = git.password.as_deref().unwrap_or_default();
            format!("https://{user}:{password}@{repository}")
        }
        None => git.repository.clone(),
    }
}
