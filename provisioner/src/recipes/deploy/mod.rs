//! Application deployment
//!
//! A deploy runs in a fixed order: install packages, render configs, place
//! files, build, restart. The helpers are also usable on their own.

pub mod templates;

use serde::Serialize;
use shared::{logging, step_info, step_warn, DeployAction, HostLabel, RetryPolicy, Role};
use std::path::{Path, PathBuf};

use crate::core::command::{chown, copy_directory_files, maintenance_toggle, maven_build, service, APP_USER};
use crate::core::roles::{java_xmx_ram_mb, maven_build_profiles, resolve_role_manifest, MIN_JAVA_XMX_MB};
use crate::core::RenderPlan;
use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

/// Packages the build and the maintenance toggle rely on
pub const DEPLOY_PACKAGES: &[&str] = &["curl", "maven", "openjdk-7-jdk"];

pub const SUDOERS_PATH: &str = "/etc/sudoers.d/matterhorn";
pub const SUDOERS_ENTRY: &str = "matterhorn ALL=NOPASSWD:/etc/init.d/matterhorn\n";

pub const CRON_DIR: &str = "/etc/cron.d";
const CRON_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";
pub const COMPRESS_LOGS_AFTER_DAYS: u32 = 7;
pub const DELETE_LOGS_AFTER_DAYS: u32 = 180;

const FELIX_FILEINSTALL_CONFIG: &str = "etc/load/org.apache.felix.fileinstall-matterhorn.cfg";

/// What a deploy did, for the caller to hand to the rendering engine
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub role: Role,
    pub action: DeployAction,
    pub deploy_root: PathBuf,
    pub render_plan: RenderPlan,
}

/// Body of a `/etc/cron.d` entry run daily as the application user
fn daily_cron_entry(command: &str) -> String {
    format!("PATH={CRON_PATH}\n@daily {APP_USER} {command}\n")
}

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    /// Put this node in or out of maintenance via the admin node.
    ///
    /// Returns `false` when the cluster has no admin instance to ask.
    pub fn toggle_maintenance_mode(&self, on: bool) -> ProvisionResult<bool> {
        let resolver = self.resolver();
        let Some((admin_host, _)) = resolver.first_instance("admin") else {
            step_warn!("⚠️ No admin instance, not toggling maintenance mode");
            return Ok(false);
        };

        let spec = maintenance_toggle(&resolver.rest_auth_info(), &resolver.private_dns_name(), &admin_host, on);
        self.executor().run_command(&spec, RetryPolicy::MAINTENANCE_TOGGLE)?;
        step_info!("🛠️ Maintenance mode set to {} via {}", on, admin_host);
        Ok(true)
    }

    /// Copy the role's manifest files within the release; returns how many were placed
    pub fn copy_files_into_place_for(&self, role: &str, deploy_root: &Path) -> ProvisionResult<usize> {
        let manifest = resolve_role_manifest(role);
        for entry in &manifest {
            let source = deploy_root.join(&entry.source_path);
            let destination = deploy_root.join(&entry.destination_path);

            let contents = self.file_system().read_to_string(&source)?;
            self.file_system().write_file(&destination, &contents, 0o644)?;
            self.executor().run_once(&chown(APP_USER, APP_USER, &destination))?;
        }
        step_info!("📁 Placed {} file(s) for {}", manifest.len(), role);
        Ok(manifest.len())
    }

    fn copy_config_directory(&self, description: &str, deploy_root: &Path, directory: &str) -> ProvisionResult<()> {
        let spec = copy_directory_files(
            description,
            &deploy_root.join("dce-config").join(directory),
            &deploy_root.join("etc").join(directory),
        );
        self.executor().run_command(&spec, RetryPolicy::CONFIG_COPY)?;
        Ok(())
    }

    pub fn copy_workflows_into_place_for_admin(&self, deploy_root: &Path) -> ProvisionResult<()> {
        self.copy_config_directory("copy workflows into place for admin", deploy_root, "workflows")
    }

    pub fn copy_configs_for_load_service(&self, deploy_root: &Path) -> ProvisionResult<()> {
        self.copy_config_directory("copy service configs", deploy_root, "load")
    }

    pub fn copy_services_into_place(&self, deploy_root: &Path) -> ProvisionResult<()> {
        self.copy_config_directory("copy services", deploy_root, "services")
    }

    pub fn maven_build_for(&self, role: &str, deploy_root: &Path) -> ProvisionResult<()> {
        let profiles = maven_build_profiles(role);
        if profiles.is_none() {
            step_warn!("⚠️ No build profiles for role '{}', building defaults", role);
        }
        self.executor()
            .run_command(&maven_build(deploy_root, profiles), RetryPolicy::BUILD)?;
        Ok(())
    }

    /// Felix must not hot-reload configs out from under the running daemon
    pub fn remove_felix_fileinstall(&self, deploy_root: &Path) -> ProvisionResult<()> {
        self.file_system().remove_file(&deploy_root.join(FELIX_FILEINSTALL_CONFIG))
    }

    /// Newest release directory under `{deploy_to}/releases`
    pub fn path_to_most_recent_deploy(&self, deploy_to: &Path) -> ProvisionResult<PathBuf> {
        let releases = deploy_to.join("releases");
        self.file_system()
            .newest_subdirectory(&releases)?
            .ok_or_else(|| ProvisionError::config(format!("no releases under {}", releases.display())))
    }

    /// Daily cron jobs compressing week-old logs and deleting half-year-old ones
    pub fn install_log_management(&self) -> ProvisionResult<()> {
        let log_dir = self.resolver().log_directory();

        let compress = format!(
            "find {log_dir} -maxdepth 1 -type f -name 'matterhorn.log.2*' -not -name '*.gz' -mtime +{COMPRESS_LOGS_AFTER_DAYS} -exec /bin/gzip {{}} \\;"
        );
        let delete = format!(
            "find {log_dir} -maxdepth 1 -type f -name 'matterhorn.log.2*.gz' -mtime +{DELETE_LOGS_AFTER_DAYS} -delete"
        );

        let cron_dir = Path::new(CRON_DIR);
        self.file_system()
            .write_file(&cron_dir.join("compress_matterhorn_logs"), &daily_cron_entry(&compress), 0o644)?;
        self.file_system()
            .write_file(&cron_dir.join("delete_matterhorn_logs"), &daily_cron_entry(&delete), 0o644)?;
        Ok(())
    }

    pub fn allow_matterhorn_user_to_restart_daemon_via_sudo(&self) -> ProvisionResult<()> {
        self.file_system()
            .write_file(Path::new(SUDOERS_PATH), SUDOERS_ENTRY, 0o600)
    }

    /// Template requests for a role's release
    pub fn render_configs_for(&self, role: Role, deploy_root: &Path, repo_root: &Path) -> ProvisionResult<RenderPlan> {
        let resolver = self.resolver();
        let log_dir = resolver.log_directory();

        let java_xmx = if resolver.auto_configure_java_xmx_memory() {
            java_xmx_ram_mb(self.collect_host_facts()?.total_memory_kb, true)
        } else {
            MIN_JAVA_XMX_MB
        };

        let mut plan = RenderPlan::new();
        for request in templates::init_scripts(deploy_root, repo_root, java_xmx, &log_dir) {
            plan.push(request);
        }
        plan.push(templates::matterhorn_conf(deploy_root, repo_root, &role.to_string(), &log_dir));
        plan.push(templates::smtp_config(deploy_root, &resolver.smtp_default_sender()));
        plan.push(templates::service_registry_config(deploy_root));
        plan.push(templates::images_properties(deploy_root));

        match role {
            Role::Admin => {
                let engage_hostname = resolver.public_engage_hostname();
                plan.push(templates::published_event_details_email(deploy_root, &engage_hostname));
                plan.push(templates::multitenancy_config(
                    deploy_root,
                    &resolver.public_admin_hostname_on_admin(),
                    &engage_hostname,
                ));
                plan.push(templates::live_streaming_config(deploy_root, &resolver.live_stream_name()));
                plan.push(templates::otherpubs_service_config(deploy_root, &resolver.auth_host()));
                plan.push(templates::auth_service_config(
                    deploy_root,
                    &resolver.auth_host(),
                    &resolver.auth_redirect_location(),
                    &resolver.auth_activated(),
                ));
            }
            Role::Engage => {
                plan.push(templates::multitenancy_config(
                    deploy_root,
                    &resolver.public_admin_hostname(),
                    &resolver.public_engage_hostname_on_engage(),
                ));
                plan.push(templates::user_tracking_config(deploy_root, &resolver.user_tracking_authhost()));
                plan.push(templates::live_streaming_config(deploy_root, &resolver.live_stream_name()));
                plan.push(templates::auth_service_config(
                    deploy_root,
                    &resolver.auth_host(),
                    &resolver.auth_redirect_location(),
                    &resolver.auth_activated(),
                ));
            }
            Role::Worker | Role::Ingest | Role::Database | Role::AssetServer => {}
        }

        Ok(plan)
    }

    /// Manifest files, config directory copies and host-level support files
    pub fn place_files_for(&self, role: Role, deploy_root: &Path) -> ProvisionResult<()> {
        self.copy_services_into_place(deploy_root)?;
        self.copy_configs_for_load_service(deploy_root)?;
        if role == Role::Admin {
            self.copy_workflows_into_place_for_admin(deploy_root)?;
        }
        self.copy_files_into_place_for(&role.to_string(), deploy_root)?;
        self.remove_felix_fileinstall(deploy_root)?;
        self.install_log_management()?;
        self.allow_matterhorn_user_to_restart_daemon_via_sudo()
    }

    pub fn restart_service(&self) -> ProvisionResult<()> {
        self.executor().run_once(&service("matterhorn", "restart"))?;
        step_info!("🔄 matterhorn restarted");
        Ok(())
    }

    /// Full deploy of `deploy_root` for `role`
    pub fn deploy(&self, role: Role, deploy_root: &Path, repo_root: &Path) -> ProvisionResult<DeployReport> {
        let action = self.resolver().deploy_action();
        step_info!("🚀 Deploying {} ({}) from {}", role, action, deploy_root.display());

        let host = HostLabel::current();
        logging::log_progress(host, "deploy", "installing packages");
        self.update_package_repo()?;
        self.install_packages(DEPLOY_PACKAGES)?;

        logging::log_progress(host, "deploy", "rendering configs");
        let render_plan = self.render_configs_for(role, deploy_root, repo_root)?;

        logging::log_progress(host, "deploy", "placing files");
        self.place_files_for(role, deploy_root)?;

        logging::log_progress(host, "deploy", "building");
        self.maven_build_for(&role.to_string(), deploy_root)?;

        logging::log_progress(host, "deploy", "restarting service");
        self.restart_service()?;

        step_info!("✅ Deployed {} with {} template(s) to render", role, render_plan.len());
        Ok(DeployReport {
            role,
            action,
            deploy_root: deploy_root.to_path_buf(),
            render_plan,
        })
    }
}
