use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure taxonomy for the cleaning pipeline.
///
/// Per-item variants (`PathNotFound`, `PermissionDenied`, `SafetyViolation`)
/// are collected into [`crate::model::DeletionOutcome`] failure lists and never
/// abort a run. `EmptyRuleSet` is fatal at configuration time, before any
/// deletion starts. `UserCancelled` terminates an interactive run immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CleanError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("no folder or file rules remain after merging configuration")]
    EmptyRuleSet,

    #[error("refusing to touch protected path: {0}")]
    SafetyViolation(PathBuf),

    #[error("operation cancelled by user")]
    UserCancelled,

    #[error("{0}")]
    Other(String),
}

impl CleanError {
    /// Map an I/O error observed while operating on `path` into the taxonomy.
    pub fn from_io(err: &io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CleanError::PathNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => CleanError::PermissionDenied(path.to_path_buf()),
            _ => CleanError::Other(format!("{}: {err}", path.display())),
        }
    }
}
