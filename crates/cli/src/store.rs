use std::path::Path;

use buildsweep_core::{CleanError, RecoverableStore};

/// Recoverable deletion backed by the OS trash. Items land in the platform
/// recovery area and are never permanently erased here.
pub struct SystemTrash;

impl RecoverableStore for SystemTrash {
    fn move_to_recoverable_storage(&self, path: &Path) -> Result<(), CleanError> {
        if !path.exists() {
            return Err(CleanError::PathNotFound(path.to_path_buf()));
        }
        trash::delete(path)
            .map_err(|err| CleanError::Other(format!("{}: {err}", path.display())))
    }
}
