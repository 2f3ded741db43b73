//! Node attribute fixtures shaped like an OpsWorks node document

use serde_json::{json, Value};
use shared::HostFacts;

pub struct TestFixtures;

impl TestFixtures {
    pub const STACK_NAME: &'static str = "DCE Production";
    pub const TOPIC_NAME: &'static str = "dce_production";
    pub const TOPIC_ARN: &'static str = "arn:aws:sns:us-east-1:123456789012:dce_production";
    pub const INSTANCE_ID: &'static str = "i-0123456789abcdef0";

    /// A full node document for `hostname`
    pub fn node(hostname: &str) -> Value {
        json!({
            "opsworks": {
                "stack": { "name": Self::STACK_NAME },
                "instance": {
                    "hostname": hostname,
                    "aws_instance_id": Self::INSTANCE_ID,
                    "private_dns_name": format!("ip-10-1-2-3.{hostname}.internal"),
                    "public_dns_name": format!("{hostname}.dce.example.edu")
                },
                "layers": {
                    "admin": {
                        "instances": {
                            "admin1": { "public_dns_name": "admin.dce.example.edu", "ip": "54.0.0.1" }
                        }
                    },
                    "engage": {
                        "instances": {
                            "engage1": { "public_dns_name": "engage.dce.example.edu", "ip": "54.0.0.2" },
                            "engage2": { "public_dns_name": "engage2.dce.example.edu", "ip": "54.0.0.3" }
                        }
                    }
                }
            },
            "deploy": {
                "matterhorn": {
                    "database": { "host": "db-master1", "username": "matterhorn", "password": "pw", "port": 3306 }
                }
            },
            "rest_auth": { "user": "system", "pass": "CHANGE_ME" },
            "storage": { "export_root": "/var/matterhorn", "network": "10.1.0.0/16" },
            "ssl": true
        })
    }

    /// Overrides layered above a node document
    pub fn overrides() -> Value {
        json!({
            "cloudfront_url": "d111111abcdef8.cloudfront.net",
            "deploy_action": "rollback"
        })
    }

    pub fn host_facts(hostname: &str) -> HostFacts {
        HostFacts {
            cpu_count: 4,
            total_memory_kb: 15_950_852,
            local_filesystems: vec!["/".to_string(), "/var/matterhorn".to_string()],
            software_raid: false,
            ..HostFacts::new(hostname)
        }
    }
}
