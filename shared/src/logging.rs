//! Shared logging utilities for consistent tracing across provisioning runs

use crate::types::HostLabel;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the per-crate filter directive for a base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("provisioner={base_level},shared={base_level}")
}

/// Initialize tracing subscriber with an optional log level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = filter_directive(log_level);

    let _ = fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize tracing subscriber at `info`
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for host-aware info logging
#[macro_export]
macro_rules! step_info {
    ($($arg:tt)*) => {
        tracing::info!(
            host = %$crate::HostLabel::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for host-aware warning logging
#[macro_export]
macro_rules! step_warn {
    ($($arg:tt)*) => {
        tracing::warn!(
            host = %$crate::HostLabel::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for host-aware error logging
#[macro_export]
macro_rules! step_error {
    ($($arg:tt)*) => {
        tracing::error!(
            host = %$crate::HostLabel::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for host-aware debug logging
#[macro_export]
macro_rules! step_debug {
    ($($arg:tt)*) => {
        tracing::debug!(
            host = %$crate::HostLabel::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(host: &HostLabel, details: &str) {
    info!(
        host = %host,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(host: &HostLabel, context: &str, error: &dyn std::fmt::Display) {
    error!(
        host = %host,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(host: &HostLabel, message: &str) {
    info!(
        host = %host,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(host: &HostLabel, action: &str, details: &str) {
    info!(
        host = %host,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(None), "provisioner=info,shared=info");
        assert_eq!(filter_directive(Some("debug")), "provisioner=debug,shared=debug");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing_with_level(Some("debug"));
        init_tracing();
        step_info!("logging initialised twice without panicking");
    }
}
