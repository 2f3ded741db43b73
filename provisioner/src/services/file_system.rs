//! Real file system service implementation

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::FileSystem;
use shared::step_debug;

/// Local file system
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) -> ProvisionResult<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|_| ProvisionError::file_system("chmod", path))
    }

    #[cfg(not(unix))]
    fn set_mode(_path: &Path, _mode: u32) -> ProvisionResult<()> {
        Ok(())
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> ProvisionResult<String> {
        fs::read_to_string(path).map_err(|_| ProvisionError::file_system("read", path))
    }

    fn write_file(&self, path: &Path, contents: &str, mode: u32) -> ProvisionResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        fs::write(path, contents).map_err(|_| ProvisionError::file_system("write", path))?;
        Self::set_mode(path, mode)?;
        step_debug!("📝 Wrote file: {} ({:o})", path.display(), mode);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> ProvisionResult<()> {
        fs::create_dir_all(path).map_err(|_| ProvisionError::file_system("create directory", path))
    }

    fn remove_file(&self, path: &Path) -> ProvisionResult<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                step_debug!("🗑️ Removed file: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(_) => Err(ProvisionError::file_system("remove", path)),
        }
    }

    fn newest_subdirectory(&self, path: &Path) -> ProvisionResult<Option<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|_| ProvisionError::file_system("list", path))?;

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_dir() {
                continue;
            }
            let modified = metadata.modified()?;
            if newest.as_ref().map_or(true, |(best, _)| modified >= *best) {
                newest = Some((modified, entry.path()));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }
}
