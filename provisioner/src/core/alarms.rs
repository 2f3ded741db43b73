//! CloudWatch alarm planning
//!
//! Alarm names are namespaced by `{topic_name}_{hostname}` so several stacks
//! can share one account. Only the alarm definitions are built here; the
//! AWS CLI does the rest.

use regex::Regex;
use serde::Serialize;
use shared::{HostFacts, RoleFlags};
use std::fmt;
use std::sync::OnceLock;

use super::command::CommandSpec;
use super::roles::{load_limit, memory_limit_percent};

/// All custom instance metrics are published to this region
pub const ALARM_REGION: &str = "us-east-1";
pub const METRIC_NAMESPACE: &str = "AWS/OpsworksCustom";
/// Percent free below which a disk alarm fires
pub const DISK_FREE_THRESHOLD: f64 = 20.0;

fn non_alphanumeric() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]").expect("literal pattern compiles"))
}

/// Lower-case a stack name and replace anything outside `[a-z0-9]` with `_`
pub fn sanitize_topic_name(stack_name: &str) -> String {
    non_alphanumeric()
        .replace_all(&stack_name.to_lowercase(), "_")
        .into_owned()
}

pub fn alarm_name_prefix(topic_name: &str, hostname: &str) -> String {
    format!("{topic_name}_{hostname}")
}

/// Metric reporting free space on a mount point
pub fn partition_metric_name(mount_point: &str) -> String {
    if mount_point == "/" {
        "SpaceFreeOnRootPartition".to_string()
    } else {
        let suffix = non_alphanumeric().replace_all(mount_point, "_");
        format!("SpaceFreeOn{suffix}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Average,
    Minimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    GreaterThanThreshold,
    LessThanThreshold,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One metric alarm on the current instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmSpec {
    pub name: String,
    pub description: String,
    pub metric_name: String,
    pub statistic: Statistic,
    pub period_seconds: u32,
    pub threshold: f64,
    pub comparison: Comparison,
    pub unit: Option<String>,
}

impl AlarmSpec {
    /// `aws cloudwatch put-metric-alarm` invocation for this alarm
    pub fn to_command(&self, instance_id: &str, topic_arn: &str) -> CommandSpec {
        let mut spec = CommandSpec::new(format!("put alarm {}", self.name), "aws")
            .args(["cloudwatch", "put-metric-alarm", "--region", ALARM_REGION])
            .args(["--alarm-name", self.name.as_str()])
            .args(["--alarm-description", self.description.as_str()])
            .args(["--metric-name", self.metric_name.as_str()])
            .args(["--namespace", METRIC_NAMESPACE])
            .arg("--statistic")
            .arg(self.statistic.to_string())
            .arg("--period")
            .arg(self.period_seconds.to_string())
            .arg("--threshold")
            .arg(self.threshold.to_string())
            .arg("--comparison-operator")
            .arg(self.comparison.to_string())
            .arg("--dimensions")
            .arg(format!("Name=InstanceId,Value={instance_id}"))
            .args(["--evaluation-periods", "1", "--alarm-actions", topic_arn]);
        if let Some(unit) = &self.unit {
            spec = spec.args(["--unit", unit.as_str()]);
        }
        spec
    }
}

/// Every alarm the host should carry, given its facts and role
pub fn plan_alarms(prefix: &str, facts: &HostFacts, flags: RoleFlags) -> Vec<AlarmSpec> {
    let mut alarms = vec![
        AlarmSpec {
            name: format!("{prefix}_load_5_high"),
            description: format!("Load 5 is high on {prefix}"),
            metric_name: "Load5".to_string(),
            statistic: Statistic::Average,
            period_seconds: 240,
            threshold: load_limit(facts.cpu_count),
            comparison: Comparison::GreaterThanThreshold,
            unit: None,
        },
        AlarmSpec {
            name: format!("{prefix}_memory_used_high"),
            description: format!("Memory usage is high on {prefix}"),
            metric_name: "MemoryUsed".to_string(),
            statistic: Statistic::Average,
            period_seconds: 240,
            threshold: f64::from(memory_limit_percent(flags.is_database)),
            comparison: Comparison::GreaterThanThreshold,
            unit: Some("Percent".to_string()),
        },
    ];

    for mount_point in &facts.local_filesystems {
        let metric_name = partition_metric_name(mount_point);
        alarms.push(AlarmSpec {
            name: format!("{prefix}_{metric_name}"),
            description: format!("{metric_name} running low on {prefix}"),
            metric_name,
            statistic: Statistic::Average,
            period_seconds: 240,
            threshold: DISK_FREE_THRESHOLD,
            comparison: Comparison::LessThanThreshold,
            unit: Some("Percent".to_string()),
        });
    }

    if facts.software_raid {
        alarms.push(AlarmSpec {
            name: format!("{prefix}_raid_array_sync"),
            description: format!("Software RAID arrays out of sync on {prefix}"),
            metric_name: "RAIDArrayInSync".to_string(),
            statistic: Statistic::Minimum,
            period_seconds: 120,
            threshold: 1.0,
            comparison: Comparison::LessThanThreshold,
            unit: None,
        });
    }

    if flags.is_admin {
        alarms.push(AlarmSpec {
            // Name kept as deployed; renaming would orphan existing alarms
            name: format!("{prefix}_mysql_availablity"),
            description: format!("MySQL is unavailable {prefix}"),
            metric_name: "MySQLServerAvailable".to_string(),
            statistic: Statistic::Minimum,
            period_seconds: 120,
            threshold: 1.0,
            comparison: Comparison::LessThanThreshold,
            unit: None,
        });
    }

    alarms
}
