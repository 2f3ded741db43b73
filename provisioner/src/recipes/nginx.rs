//! nginx reverse proxy in front of the application

use shared::step_info;
use std::path::Path;

use crate::core::command::service;
use crate::core::{RenderPlan, TemplateRequest};
use crate::error::ProvisionResult;
use crate::traits::{CommandRunner, ConfigSource, FileSystem, HostFactsSource, Sleeper};
use crate::Provisioner;

pub const BACKEND_HTTP_PORT: u16 = 8080;
pub const SITE_CONFIG_PATH: &str = "/etc/nginx/sites-enabled/default";
pub const PROXY_INCLUDES_DIR: &str = "/etc/nginx/proxy-includes";

impl<C, R, S, F, H> Provisioner<C, R, S, F, H>
where
    C: ConfigSource,
    R: CommandRunner,
    S: Sleeper,
    F: FileSystem,
    H: HostFactsSource,
{
    pub fn configure_nginx_proxy(&self) -> ProvisionResult<RenderPlan> {
        self.update_package_repo()?;
        self.install_package("nginx")?;

        let mut plan = RenderPlan::new();
        plan.push(
            TemplateRequest::root("nginx-proxy.conf.erb", SITE_CONFIG_PATH)
                .var("matterhorn_backend_http_port", BACKEND_HTTP_PORT),
        );

        self.file_system().create_dir_all(Path::new(PROXY_INCLUDES_DIR))?;
        self.executor().run_once(&service("nginx", "reload"))?;

        step_info!("🌐 nginx proxy configured for backend port {}", BACKEND_HTTP_PORT);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::path::Path;

    use super::super::test_support::*;
    use super::*;
    use crate::traits::{MockFileSystem, MockHostFactsSource};

    #[test]
    fn test_configure_nginx_proxy() {
        let (runner, log) = recording_runner("");
        let mut fs = MockFileSystem::new();
        fs.expect_create_dir_all()
            .withf(|path| path == Path::new(PROXY_INCLUDES_DIR))
            .times(1)
            .returning(|_| Ok(()));

        let plan = provisioner(json!({}), runner, fs, MockHostFactsSource::new())
            .configure_nginx_proxy()
            .unwrap();

        assert_eq!(
            descriptions(&log),
            vec!["update package repository", "install nginx", "service nginx reload"]
        );
        let site = plan.find("nginx-proxy.conf.erb").unwrap();
        assert_eq!(site.destination, Path::new(SITE_CONFIG_PATH));
        assert_eq!(site.variables["matterhorn_backend_http_port"], json!(8080));
    }
}
