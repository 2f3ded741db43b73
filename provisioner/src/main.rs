//! Main entry point for the provisioner binary
//!
//! Loads node attributes, wires the real services together and runs one
//! recipe or query. Structured results go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use provisioner::{
    core::{classify_host, memory_limit_percent, resolve_role_manifest},
    services::{DryRunCommandRunner, LayeredConfig, RealCommandRunner, RealFileSystem, RealHostFacts, ThreadSleeper},
    CommandRunner, Provisioner,
};
use shared::{logging, step_debug, step_warn, HostLabel, Role};

/// Provisioning recipes for media-processing cluster hosts
#[derive(Parser)]
#[command(name = "provisioner")]
#[command(about = "Provision and deploy media-processing cluster hosts")]
pub struct Args {
    /// Node attribute JSON file; repeat to layer, earlier files win
    #[arg(long = "config", global = true)]
    pub config: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the resolved value of a configuration key
    Resolve {
        key: String,
        /// Returned when the key is absent; parsed as JSON when possible
        #[arg(long)]
        default: Option<String>,
    },
    /// Print role flags and memory alarm threshold for a hostname
    Classify {
        /// Defaults to the configured instance hostname
        #[arg(long)]
        hostname: Option<String>,
    },
    /// Print the file manifest for a role
    Manifest { role: String },
    /// Print the base media download URL and domain
    MediaUrl {
        #[arg(long)]
        engage_host: String,
    },
    /// Print the alarms for this host, or create them with --apply
    Alarms {
        #[arg(long)]
        apply: bool,
    },
    UpdatePackageRepo,
    InstallPackage { name: String },
    /// Print the /root/.my.cnf render request
    WriteMyCnf,
    NginxProxy,
    EnhancedNetworking {
        /// Directory holding enable_enhanced_networking.sh
        #[arg(long, default_value = "files/default")]
        files_dir: PathBuf,
    },
    Maintenance {
        #[arg(value_enum)]
        state: MaintenanceState,
    },
    /// Deploy a release for a role
    Deploy {
        #[arg(long)]
        role: Role,
        /// Release to configure; defaults to the newest under <repo-root>/releases
        #[arg(long)]
        deploy_root: Option<PathBuf>,
        #[arg(long)]
        repo_root: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MaintenanceState {
    On,
    Off,
}

fn load_config(paths: &[PathBuf]) -> Result<LayeredConfig> {
    if !paths.is_empty() {
        return LayeredConfig::from_files(paths).context("Failed to load node attributes");
    }

    dotenv::dotenv().ok();
    match std::env::var("PROVISION_CONFIG") {
        Ok(path) => LayeredConfig::from_files(&[PathBuf::from(&path)])
            .with_context(|| format!("Failed to load node attributes from PROVISION_CONFIG={path}")),
        Err(_) => {
            step_warn!("⚠️ No node attributes given, every setting resolves to its default");
            Ok(LayeredConfig::new())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

fn run<R: CommandRunner>(command: Command, config: LayeredConfig, runner: R) -> Result<()> {
    let provisioner = Provisioner::new(config, runner, ThreadSleeper, RealFileSystem::new(), RealHostFacts::new());
    let resolver = provisioner.resolver();

    match command {
        Command::Resolve { key, default } => {
            let default = default
                .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
                .unwrap_or(Value::Null);
            print_json(&resolver.resolve(&key, default))
        }
        Command::Classify { hostname } => {
            let hostname = hostname.unwrap_or_else(|| resolver.hostname());
            let flags = classify_host(&hostname);
            print_json(&json!({
                "hostname": hostname,
                "flags": flags,
                "memory_limit_percent": memory_limit_percent(flags.is_database),
            }))
        }
        Command::Manifest { role } => print_json(&resolve_role_manifest(&role)),
        Command::MediaUrl { engage_host } => {
            print_json(&json!({
                "url": resolver.base_media_download_url(&engage_host),
                "domain": resolver.base_media_download_domain(&engage_host),
            }))
        }
        Command::Alarms { apply } => {
            let alarms = if apply {
                provisioner.create_alerts().context("Failed to create alarms")?
            } else {
                provisioner.plan_host_alarms().context("Failed to plan alarms")?
            };
            print_json(&alarms)
        }
        Command::UpdatePackageRepo => Ok(provisioner.update_package_repo()?),
        Command::InstallPackage { name } => Ok(provisioner.install_package(&name)?),
        Command::WriteMyCnf => print_json(&provisioner.write_root_my_cnf()),
        Command::NginxProxy => print_json(&provisioner.configure_nginx_proxy()?),
        Command::EnhancedNetworking { files_dir } => Ok(provisioner.enable_enhanced_networking(&files_dir)?),
        Command::Maintenance { state } => {
            let toggled = provisioner.toggle_maintenance_mode(matches!(state, MaintenanceState::On))?;
            print_json(&json!({ "toggled": toggled }))
        }
        Command::Deploy { role, deploy_root, repo_root } => {
            let deploy_root = match deploy_root {
                Some(root) => root,
                None => provisioner
                    .path_to_most_recent_deploy(&repo_root)
                    .context("Failed to find a release to deploy")?,
            };
            let report = provisioner
                .deploy(role, &deploy_root, &repo_root)
                .with_context(|| format!("Deploy of {} failed", deploy_root.display()))?;
            print_json(&report)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_tracing_with_level(Some(&args.log_level));

    let config = load_config(&args.config)?;
    let hostname = provisioner::Resolver::new(config.clone()).hostname();
    let host = HostLabel::init(if hostname.is_empty() { "localhost".to_string() } else { hostname });

    logging::log_startup(host, "provisioner");
    step_debug!("📚 {} configuration layer(s), dry run: {}", config.len(), args.dry_run);

    let result = if args.dry_run {
        run(args.command, config, DryRunCommandRunner)
    } else {
        run(args.command, config, RealCommandRunner::new())
    };

    match &result {
        Ok(()) => logging::log_success(host, "provisioning step complete"),
        Err(e) => logging::log_error(host, "provisioning step", e),
    }
    result
}
