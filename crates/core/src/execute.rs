//! Plan execution: safety checks, recoverable deletion, and the dry-run /
//! batch / interactive modes.
//!
//! The executor never erases anything itself. Deletion goes through an
//! injected [`RecoverableStore`], and interactive decisions come from an
//! injected [`ConfirmationSource`], so both are substitutable in tests and
//! the core carries no OS trash plumbing and no terminal dependency.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::CleanError;
use crate::model::{Decision, DeletionOutcome, DeletionPlan, ExecutionMode};
use crate::scan::directory_size;

/// Roots that must never be deleted, nor deleted from, nor contain the
/// target as an ancestor. Checked against the canonicalized path.
pub const PROTECTED_ROOTS: &[&str] = &[
    "/",
    "/bin",
    "/boot",
    "/dev",
    "/etc",
    "/lib",
    "/proc",
    "/sbin",
    "/sys",
    "/usr",
    "/var",
    "C:\\",
    "C:\\Windows",
    "C:\\Program Files",
];

/// Moves a path into recoverable storage (an OS trash equivalent). The
/// implementation must never silently no-op and never permanently erase.
pub trait RecoverableStore {
    fn move_to_recoverable_storage(&self, path: &Path) -> Result<(), CleanError>;
}

/// Supplies one [`Decision`] per plan item during interactive execution. The
/// call blocks the executor until an answer arrives.
pub trait ConfirmationSource {
    fn decide(&mut self, target: &Path) -> Result<Decision, CleanError>;
}

/// Reject targets that are protected roots, ancestors of protected roots,
/// nested inside one, or still carry a `..` segment.
pub fn check_safety(path: &Path) -> Result<(), CleanError> {
    if path.components().any(|part| part == Component::ParentDir) {
        return Err(CleanError::SafetyViolation(path.to_path_buf()));
    }

    let canonical = path
        .canonicalize()
        .map_err(|err| CleanError::from_io(&err, path))?;

    for root in PROTECTED_ROOTS {
        let protected = Path::new(root);
        if canonical == protected || protected.starts_with(&canonical) {
            return Err(CleanError::SafetyViolation(canonical));
        }
        // Inside-a-protected-root check; the filesystem root would match
        // every absolute path and is covered by the ancestor check above.
        if protected.parent().is_some() && canonical.starts_with(protected) {
            return Err(CleanError::SafetyViolation(canonical));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    File,
    Dir,
}

/// Executes a [`DeletionPlan`] against an injected store. Files are always
/// fully processed before directories, and directories arrive deepest-first
/// from the plan.
pub struct DeletionExecutor<'a> {
    store: &'a dyn RecoverableStore,
    confirmation: Option<&'a mut dyn ConfirmationSource>,
}

impl<'a> DeletionExecutor<'a> {
    pub fn new(store: &'a dyn RecoverableStore) -> Self {
        Self {
            store,
            confirmation: None,
        }
    }

    pub fn with_confirmation(
        store: &'a dyn RecoverableStore,
        confirmation: &'a mut dyn ConfirmationSource,
    ) -> Self {
        Self {
            store,
            confirmation: Some(confirmation),
        }
    }

    /// Run the plan in the given mode.
    ///
    /// Per-item failures land in the outcome and never block later items. The
    /// only fatal outcomes are a missing confirmation source for interactive
    /// mode and an abort decision, which discards the rest of the plan and
    /// surfaces [`CleanError::UserCancelled`] instead of a normal outcome.
    pub fn execute(
        &mut self,
        plan: &DeletionPlan,
        mode: ExecutionMode,
    ) -> Result<DeletionOutcome, CleanError> {
        if mode == ExecutionMode::Interactive && self.confirmation.is_none() {
            return Err(CleanError::Other(
                "interactive execution requires a confirmation source".to_string(),
            ));
        }

        let mut outcome = DeletionOutcome::default();
        if mode == ExecutionMode::DryRun {
            self.dry_run(plan, &mut outcome);
            return Ok(outcome);
        }

        // ConfirmAll is absorbing: once set, the run behaves like batch.
        let mut confirm_all = mode == ExecutionMode::Batch;

        for file in &plan.files {
            self.process(file, TargetKind::File, &mut confirm_all, &mut outcome)?;
        }
        for dir in &plan.dirs {
            self.process(dir, TargetKind::Dir, &mut confirm_all, &mut outcome)?;
        }

        Ok(outcome)
    }

    /// Record the full would-delete effect without touching the filesystem.
    /// Sizes are best-effort; unreadable targets count as zero bytes.
    fn dry_run(&self, plan: &DeletionPlan, outcome: &mut DeletionOutcome) {
        for file in &plan.files {
            let size = fs::metadata(file).map(|meta| meta.len()).unwrap_or(0);
            outcome.bytes_freed = outcome.bytes_freed.saturating_add(size);
            outcome.deleted_files.push(file.clone());
        }
        for dir in &plan.dirs {
            outcome.bytes_freed = outcome.bytes_freed.saturating_add(directory_size(dir));
            outcome.deleted_dirs.push(dir.clone());
        }
    }

    fn process(
        &mut self,
        path: &Path,
        kind: TargetKind,
        confirm_all: &mut bool,
        outcome: &mut DeletionOutcome,
    ) -> Result<(), CleanError> {
        if !*confirm_all {
            let source = self
                .confirmation
                .as_deref_mut()
                .expect("checked before execution starts");
            match source.decide(path)? {
                Decision::Confirm => {}
                Decision::Skip => return Ok(()),
                Decision::ConfirmAll => *confirm_all = true,
                Decision::Abort => return Err(CleanError::UserCancelled),
            }
        }

        if let Err(err) = check_safety(path) {
            record_failure(outcome, kind, path, err);
            return Ok(());
        }

        let size = match kind {
            TargetKind::File => fs::metadata(path).map(|meta| meta.len()).unwrap_or(0),
            TargetKind::Dir => directory_size(path),
        };

        match self.store.move_to_recoverable_storage(path) {
            Ok(()) => {
                debug!(path = %path.display(), size, "moved to recoverable storage");
                outcome.bytes_freed = outcome.bytes_freed.saturating_add(size);
                match kind {
                    TargetKind::File => outcome.deleted_files.push(path.to_path_buf()),
                    TargetKind::Dir => outcome.deleted_dirs.push(path.to_path_buf()),
                }
            }
            Err(err) => record_failure(outcome, kind, path, err),
        }

        Ok(())
    }
}

fn record_failure(outcome: &mut DeletionOutcome, kind: TargetKind, path: &Path, err: CleanError) {
    debug!(path = %path.display(), %err, "deletion failed");
    let entry = (path.to_path_buf(), err);
    match kind {
        TargetKind::File => outcome.failed_files.push(entry),
        TargetKind::Dir => outcome.failed_dirs.push(entry),
    }
}
