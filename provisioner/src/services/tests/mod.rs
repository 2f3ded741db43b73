//! Service-specific tests
//!
//! Each service has its own test file; shared helpers live in `common`.

mod command_runner;
mod file_system;

// Common test utilities for services
pub mod common {
    use std::path::Path;

    /// Write a file under a temp dir and return its path
    pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("fixture written");
        path
    }
}
