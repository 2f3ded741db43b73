//! Structured command descriptors
//!
//! Commands are described as a program plus an argument vector and handed to
//! a [`CommandRunner`](crate::traits::CommandRunner). Nothing here is ever
//! interpolated into a shell string, so configuration values containing
//! spaces or quotes reach the program verbatim.

use serde::Serialize;
use shared::AuthInfo;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout applied to package manager invocations
pub const PACKAGE_TIMEOUT: Duration = Duration::from_secs(180);

/// JVM options for the application build
pub const MAVEN_OPTS: &str = "-Xms256m -Xmx960m -XX:PermSize=64m -XX:MaxPermSize=256m";

/// Account the application runs as
pub const APP_USER: &str = "matterhorn";

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// Human-readable name used in logs and failure reports
    pub description: String,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// Run as this user instead of the current one
    pub user: Option<String>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(description: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            user: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Result of running a command to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal or timed out
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Summary of a failed run for error reports
    pub fn failure_detail(&self) -> String {
        let status = match self.status {
            Some(code) => format!("exit status {code}"),
            None => "terminated without exit status".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{status}: {stderr}")
        }
    }
}

pub fn apt_update() -> CommandSpec {
    CommandSpec::new("update package repository", "apt-get")
        .arg("update")
        .env("DEBIAN_FRONTEND", "noninteractive")
        .timeout(PACKAGE_TIMEOUT)
}

pub fn apt_install(package: &str) -> CommandSpec {
    CommandSpec::new(format!("install {package}"), "apt-get")
        .args(["install", "-y", package])
        .env("DEBIAN_FRONTEND", "noninteractive")
        .timeout(PACKAGE_TIMEOUT)
}

pub fn service(name: &str, action: &str) -> CommandSpec {
    CommandSpec::new(format!("service {name} {action}"), "service").args([name, action])
}

pub fn chown(owner: &str, group: &str, path: &Path) -> CommandSpec {
    CommandSpec::new(format!("chown {}", path.display()), "chown")
        .arg(format!("{owner}:{group}"))
        .arg(path.display().to_string())
}

/// Copy every regular file directly inside `source_dir` into `dest_dir`
pub fn copy_directory_files(description: &str, source_dir: &Path, dest_dir: &Path) -> CommandSpec {
    CommandSpec::new(description, "find").args([
        source_dir.display().to_string(),
        "-maxdepth".to_string(),
        "1".to_string(),
        "-type".to_string(),
        "f".to_string(),
        "-exec".to_string(),
        "cp".to_string(),
        "-t".to_string(),
        dest_dir.display().to_string(),
        "{}".to_string(),
        "+".to_string(),
    ])
}

/// Build the application into `deploy_root` with the given maven profiles
pub fn maven_build(deploy_root: &Path, profiles: Option<&str>) -> CommandSpec {
    let mut spec = CommandSpec::new("maven build for matterhorn", "mvn")
        .args(["clean", "install"])
        .arg(format!("-DdeployTo={}", deploy_root.display()))
        .arg("-Dmaven.test.skip=true")
        .env("MAVEN_OPTS", MAVEN_OPTS)
        .cwd(deploy_root);
    if let Some(profiles) = profiles {
        spec = spec.arg(format!("-P{profiles}"));
    }
    spec
}

/// Flip maintenance mode for `node_host` through the admin node's REST API
pub fn maintenance_toggle(auth: &AuthInfo, node_host: &str, admin_host: &str, on: bool) -> CommandSpec {
    CommandSpec::new(format!("toggle maintenance mode to {on}"), "/usr/bin/curl")
        .args(["-s", "--digest", "-u"])
        .arg(format!("{}:{}", auth.user, auth.pass))
        .args(["-H", "X-Requested-Auth: Digest", "-F"])
        .arg(format!("host=http://{node_host}"))
        .arg("-F")
        .arg(format!("maintenance={on}"))
        .arg(format!("http://{admin_host}/services/maintenance"))
        .user(APP_USER)
}

pub fn enhanced_networking(script: &Path, driver_version: &str, bucket_name: &str) -> CommandSpec {
    CommandSpec::new("fully enable enhanced networking", script.display().to_string())
        .args([driver_version, bucket_name])
}

/// Idempotently create the SNS topic alarms notify; prints the topic ARN
pub fn sns_create_topic(topic_name: &str, region: &str) -> CommandSpec {
    CommandSpec::new(format!("create sns topic {topic_name}"), "aws").args([
        "sns",
        "create-topic",
        "--name",
        topic_name,
        "--region",
        region,
        "--output",
        "text",
    ])
}
