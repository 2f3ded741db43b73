//! Core provisioning logic
//!
//! Pure derivations with no I/O of their own: configuration resolution,
//! role rules, alarm planning and command/template descriptors.

pub mod alarms;
pub mod command;
pub mod media;
pub mod resolver;
pub mod roles;
pub mod template;

pub use alarms::{plan_alarms, AlarmSpec};
pub use command::{CommandOutput, CommandSpec};
pub use media::effective_media_download_url;
pub use resolver::{git_repo_url, Resolver};
pub use roles::{classify_host, memory_limit_percent, resolve_role_manifest};
pub use template::{RenderPlan, TemplateRequest};
