//! Retry policy attached to a single external command invocation

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

/// Bounded, fixed-delay retry policy. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay_seconds: u64,
}

impl RetryPolicy {
    /// Package mirrors are flaky; give them several chances
    pub const PACKAGE_INSTALL: RetryPolicy = RetryPolicy { max_attempts: 5, delay_seconds: 15 };
    pub const MAINTENANCE_TOGGLE: RetryPolicy = RetryPolicy { max_attempts: 5, delay_seconds: 30 };
    pub const CONFIG_COPY: RetryPolicy = RetryPolicy { max_attempts: 3, delay_seconds: 10 };
    pub const BUILD: RetryPolicy = RetryPolicy { max_attempts: 3, delay_seconds: 30 };

    /// Create a policy; `max_attempts` must be at least 1
    pub fn new(max_attempts: u32, delay_seconds: u64) -> SharedResult<Self> {
        if max_attempts == 0 {
            return Err(SharedError::InvalidConfig {
                field: "max_attempts".to_string(),
                value: max_attempts.to_string(),
            });
        }
        Ok(Self { max_attempts, delay_seconds })
    }

    /// Single attempt, no retries
    pub const fn once() -> Self {
        Self { max_attempts: 1, delay_seconds: 0 }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_seconds(&self) -> u64 {
        self.delay_seconds
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

/// Deserialized policies go through [`RetryPolicy::new`] validation
impl<'de> Deserialize<'de> for RetryPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            max_attempts: u32,
            delay_seconds: u64,
        }

        let fields = Fields::deserialize(deserializer)?;
        RetryPolicy::new(fields.max_attempts, fields.delay_seconds).map_err(serde::de::Error::custom)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}
