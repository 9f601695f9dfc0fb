use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CleanError;

/// What to clean: exact directory names and bare-filename glob patterns.
///
/// Sets collapse duplicates and make rule order irrelevant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleaningRule {
    pub folders: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

impl CleaningRule {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Scan constraints. Every field is optional; absence means "no constraint".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanOptions {
    #[serde(default)]
    pub recursive: Option<bool>,
    #[serde(default)]
    pub follow_symlinks: Option<bool>,
    #[serde(default)]
    pub min_size: Option<u64>,
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub min_age_days: Option<u32>,
    #[serde(default)]
    pub max_age_days: Option<u32>,
}

impl ScanOptions {
    /// Recursion is on unless explicitly disabled.
    pub fn recursive(&self) -> bool {
        self.recursive.unwrap_or(true)
    }

    /// Symlinked directories are not traversed unless explicitly requested.
    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    /// Field-by-field override: a value present in `other` wins.
    pub fn merged_with(&self, other: &ScanOptions) -> ScanOptions {
        ScanOptions {
            recursive: other.recursive.or(self.recursive),
            follow_symlinks: other.follow_symlinks.or(self.follow_symlinks),
            min_size: other.min_size.or(self.min_size),
            max_size: other.max_size.or(self.max_size),
            min_age_days: other.min_age_days.or(self.min_age_days),
            max_age_days: other.max_age_days.or(self.max_age_days),
        }
    }
}

/// Fully resolved snapshot a scan runs against: rules, exclusion prefixes, and
/// options. Built once by [`crate::profile::resolve`] and treated as immutable
/// afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanProfile {
    pub rules: CleaningRule,
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
    #[serde(default)]
    pub options: ScanOptions,
}

/// Outcome of one traversal pass over a fixed set of roots.
///
/// Invariant: no element of `matched_folders` is an ancestor or descendant of
/// another; a folder match prunes descent, so its contents are never visited,
/// counted, or matched individually.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScanResult {
    pub matched_folders: Vec<PathBuf>,
    pub matched_files: Vec<PathBuf>,
    pub total_matched_size: u64,
    pub total_dirs_visited: u64,
    pub total_files_visited: u64,
}

/// Ordered deletion work list derived from a [`ScanResult`].
///
/// Invariant: `dirs` is sorted deepest-first, so any directory always precedes
/// its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

impl DeletionPlan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Result of one execution pass over a [`DeletionPlan`]. Failures carry the
/// per-item reason; a failed item never blocks the rest of the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub deleted_files: Vec<PathBuf>,
    pub deleted_dirs: Vec<PathBuf>,
    pub failed_files: Vec<(PathBuf, CleanError)>,
    pub failed_dirs: Vec<(PathBuf, CleanError)>,
    pub bytes_freed: u64,
}

/// How a plan is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Compute the full effect without touching the filesystem.
    DryRun,
    /// Delete everything in plan order, collecting failures.
    Batch,
    /// Ask an injected confirmation source before each item.
    Interactive,
}

/// Answer returned by a confirmation source for one plan item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Delete this item.
    Confirm,
    /// Leave this item untouched; it is neither deleted nor failed.
    Skip,
    /// Delete this item and everything after it without further prompts.
    ConfirmAll,
    /// Stop immediately and discard the rest of the plan.
    Abort,
}

/// Read-only statistics view over a finished run. Never mutated after
/// aggregation.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
    pub files_matched: u64,
    pub dirs_matched: u64,
    pub files_deleted: u64,
    pub dirs_deleted: u64,
    pub files_failed: u64,
    pub dirs_failed: u64,
    pub bytes_freed: u64,
    pub elapsed_ms: u64,
}
