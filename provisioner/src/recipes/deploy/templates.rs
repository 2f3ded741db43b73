//! Template requests for a deployed release
//!
//! `deploy_root` is the release being configured, `repo_root` the deploy
//! target whose `current` symlink points at the active release.

use std::path::Path;

use crate::core::TemplateRequest;

fn in_release(deploy_root: &Path, relative: &str) -> std::path::PathBuf {
    deploy_root.join(relative)
}

fn current_root(repo_root: &Path) -> String {
    repo_root.join("current").display().to_string()
}

fn current(repo_root: &Path, relative: &str) -> String {
    repo_root.join("current").join(relative).display().to_string()
}

pub fn published_event_details_email(deploy_root: &Path, engage_hostname: &str) -> TemplateRequest {
    TemplateRequest::app("publishedEventDetails.erb", in_release(deploy_root, "etc/email/publishedEventDetails"))
        .var("engage_hostname", engage_hostname)
}

pub fn user_tracking_config(deploy_root: &Path, user_tracking_authhost: &str) -> TemplateRequest {
    TemplateRequest::app(
        "UserTrackingServiceImpl.properties.erb",
        in_release(
            deploy_root,
            "etc/services/org.opencastproject.usertracking.impl.UserTrackingServiceImpl.properties",
        ),
    )
    .var("user_tracking_authhost", user_tracking_authhost)
}

pub fn otherpubs_service_config(deploy_root: &Path, auth_host: &str) -> TemplateRequest {
    TemplateRequest::app(
        "edu.harvard.dce.otherpubs.service.OtherpubsService.properties.erb",
        in_release(deploy_root, "etc/services/edu.harvard.dce.otherpubs.service.OtherpubsService.properties"),
    )
    .var("auth_host", auth_host)
}

/// Job dispatching is driven elsewhere, so the registry's own interval is disabled
pub fn service_registry_config(deploy_root: &Path) -> TemplateRequest {
    TemplateRequest::app(
        "ServiceRegistryJpaImpl.properties.erb",
        in_release(
            deploy_root,
            "etc/services/org.opencastproject.serviceregistry.impl.ServiceRegistryJpaImpl.properties",
        ),
    )
    .var("dispatch_interval", 0)
}

pub fn images_properties(deploy_root: &Path) -> TemplateRequest {
    TemplateRequest::app(
        "matterhorn-images.properties.erb",
        in_release(deploy_root, "etc/encoding/matterhorn-images.properties"),
    )
}

/// System init script plus the release's launcher harness
pub fn init_scripts(deploy_root: &Path, repo_root: &Path, java_xmx_ram_mb: u64, log_directory: &str) -> Vec<TemplateRequest> {
    vec![
        TemplateRequest::app("matterhorn-init-script.erb", "/etc/init.d/matterhorn")
            .mode(0o755)
            .var("matterhorn_executable", current(repo_root, "bin/matterhorn")),
        TemplateRequest::app("matterhorn-harness.erb", in_release(deploy_root, "bin/matterhorn"))
            .mode(0o755)
            .var("java_xmx_ram", java_xmx_ram_mb)
            .var("main_config_file", current(repo_root, "etc/matterhorn.conf"))
            .var("matterhorn_root", current_root(repo_root))
            .var("felix_config_dir", current(repo_root, "etc"))
            .var("matterhorn_log_directory", log_directory),
    ]
}

pub fn matterhorn_conf(deploy_root: &Path, repo_root: &Path, node_profile: &str, log_directory: &str) -> TemplateRequest {
    TemplateRequest::app("matterhorn.conf.erb", in_release(deploy_root, "etc/matterhorn.conf"))
        .var("matterhorn_root", current_root(repo_root))
        .var("node_profile", node_profile)
        .var("matterhorn_log_directory", log_directory)
}

pub fn multitenancy_config(deploy_root: &Path, admin_hostname: &str, engage_hostname: &str) -> TemplateRequest {
    TemplateRequest::app(
        "mh_default_org.cfg.erb",
        in_release(deploy_root, "etc/load/org.opencastproject.organization-mh_default_org.cfg"),
    )
    .var("hostname", admin_hostname)
    .var("admin_hostname", admin_hostname)
    .var("engage_hostname", engage_hostname)
}

pub fn smtp_config(deploy_root: &Path, default_email_sender: &str) -> TemplateRequest {
    TemplateRequest::app(
        "org.opencastproject.kernel.mail.SmtpService.properties.erb",
        in_release(deploy_root, "etc/services/org.opencastproject.kernel.mail.SmtpService.properties"),
    )
    .var("default_email_sender", default_email_sender)
}

pub fn live_streaming_config(deploy_root: &Path, live_stream_name: &str) -> TemplateRequest {
    TemplateRequest::app(
        "edu.harvard.dce.live.impl.LiveServiceImpl.properties.erb",
        in_release(deploy_root, "etc/services/edu.harvard.dce.live.impl.LiveServiceImpl.properties"),
    )
    .var("live_stream_name", live_stream_name)
}

pub fn auth_service_config(deploy_root: &Path, auth_host: &str, redirect_location: &str, auth_activated: &str) -> TemplateRequest {
    TemplateRequest::app(
        "edu.harvard.dce.auth.impl.HarvardDCEAuthServiceImpl.properties.erb",
        in_release(deploy_root, "etc/services/edu.harvard.dce.auth.impl.HarvardDCEAuthServiceImpl.properties"),
    )
    .var("auth_host", auth_host)
    .var("redirect_location", redirect_location)
    .var("auth_activated", auth_activated)
}
