//! Blocking sleeper used between retry attempts

use std::time::Duration;

use crate::traits::Sleeper;

/// Blocks the calling thread
#[derive(Debug, Clone, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
