//! Root mysql client credentials

use serde_json::Value;
use shared::step_info;

use crate::core::roles::classify_host;
use crate::core::TemplateRequest;
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

pub const MY_CNF_PATH: &str = "/root/.my.cnf";

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    /// `/root/.my.cnf` pointing the mysql client at the cluster database
    pub fn write_root_my_cnf(&self) -> TemplateRequest {
        let resolver = self.resolver();
        let is_db_host = classify_host(&resolver.hostname()).is_database;
        step_info!("🗄️ Writing {} (database host: {})", MY_CNF_PATH, is_db_host);

        TemplateRequest::root("my.cnf.erb", MY_CNF_PATH)
            .mode(0o600)
            .var("is_db_host", is_db_host)
            .var("host", resolver.resolve("deploy.matterhorn.database.host", String::new()))
            .var("username", resolver.resolve("deploy.matterhorn.database.username", String::new()))
            .var("password", resolver.resolve("deploy.matterhorn.database.password", String::new()))
            .var("port", resolver.resolve("deploy.matterhorn.database.port", Value::from(3306)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::*;
    use super::MY_CNF_PATH;
    use crate::traits::{MockCommandRunner, MockFileSystem, MockHostFactsSource};

    fn my_cnf(config: serde_json::Value) -> crate::core::TemplateRequest {
        provisioner(config, MockCommandRunner::new(), MockFileSystem::new(), MockHostFactsSource::new()).write_root_my_cnf()
    }

    #[test]
    fn test_database_host_template() {
        let request = my_cnf(json!({
            "opsworks": { "instance": { "hostname": "db-master1" } },
            "deploy": { "matterhorn": { "database": {
                "host": "db.internal", "username": "mh", "password": "secret", "port": 3307
            } } }
        }));

        assert_eq!(request.destination.to_str(), Some(MY_CNF_PATH));
        assert_eq!(request.owner, "root");
        assert_eq!(request.mode, Some(0o600));
        assert_eq!(request.variables["is_db_host"], json!(true));
        assert_eq!(request.variables["host"], json!("db.internal"));
        assert_eq!(request.variables["username"], json!("mh"));
        assert_eq!(request.variables["password"], json!("secret"));
        assert_eq!(request.variables["port"], json!(3307));
    }

    #[test]
    fn test_other_hosts_and_missing_database_info() {
        let request = my_cnf(json!({ "opsworks": { "instance": { "hostname": "admin1" } } }));

        assert_eq!(request.variables["is_db_host"], json!(false));
        assert_eq!(request.variables["host"], json!(""));
        assert_eq!(request.variables["port"], json!(3306));
    }

    #[test]
    fn test_db_master_must_be_a_prefix() {
        let request = my_cnf(json!({ "opsworks": { "instance": { "hostname": "old-db-master" } } }));
        assert_eq!(request.variables["is_db_host"], json!(false));
    }
}
