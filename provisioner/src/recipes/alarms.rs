//! CloudWatch alarms from OpsWorks custom metrics

use shared::{step_error, step_info};

use crate::core::alarms::ALARM_REGION;
use crate::core::command::sns_create_topic;
use crate::core::{plan_alarms, AlarmSpec};
use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    /// Alarms this host should carry
    pub fn plan_host_alarms(&self) -> ProvisionResult<Vec<AlarmSpec>> {
        let facts = self.collect_host_facts()?;
        let resolver = self.resolver();
        Ok(plan_alarms(&resolver.alarm_name_prefix(), &facts, resolver.role_flags()))
    }

    /// Create the stack's SNS topic and put every planned alarm.
    ///
    /// Every alarm is attempted; failures are reported together afterwards.
    pub fn create_alerts(&self) -> ProvisionResult<Vec<AlarmSpec>> {
        let alarms = self.plan_host_alarms()?;
        let resolver = self.resolver();
        let instance_id = resolver.aws_instance_id();

        // create-topic is idempotent and prints the existing ARN
        let topic = self
            .executor()
            .run_once(&sns_create_topic(&resolver.topic_name(), ALARM_REGION))?;
        let topic_arn = topic.stdout.trim().to_string();
        if topic_arn.is_empty() {
            return Err(ProvisionError::CommandFailed {
                description: format!("create sns topic {}", resolver.topic_name()),
                attempts: 1,
                detail: "no topic ARN returned".to_string(),
            });
        }
        step_info!("📣 Alarms notify {}", topic_arn);

        let failed: Vec<&str> = alarms
            .iter()
            .filter(|alarm| {
                match self.executor().run_once(&alarm.to_command(&instance_id, &topic_arn)) {
                    Ok(_) => false,
                    Err(e) => {
                        step_error!("❌ Could not put alarm {}: {}", alarm.name, e);
                        true
                    }
                }
            })
            .map(|alarm| alarm.name.as_str())
            .collect();

        if !failed.is_empty() {
            return Err(ProvisionError::CommandFailed {
                description: "put metric alarms".to_string(),
                attempts: 1,
                detail: format!("{} of {} failed: {}", failed.len(), alarms.len(), failed.join(", ")),
            });
        }

        step_info!("🔔 {} alarm(s) in place", alarms.len());
        Ok(alarms)
    }
}
