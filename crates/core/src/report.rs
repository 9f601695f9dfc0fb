//! Pure combination of scan and deletion results into presentation-ready
//! statistics. No filesystem access.

use std::time::Duration;

use crate::model::{DeletionOutcome, ScanResult, Stats};

/// Derive the read-only [`Stats`] view for a finished run.
pub fn aggregate(scan: &ScanResult, outcome: &DeletionOutcome, elapsed: Duration) -> Stats {
    Stats {
        files_scanned: scan.total_files_visited,
        dirs_scanned: scan.total_dirs_visited,
        files_matched: scan.matched_files.len() as u64,
        dirs_matched: scan.matched_folders.len() as u64,
        files_deleted: outcome.deleted_files.len() as u64,
        dirs_deleted: outcome.deleted_dirs.len() as u64,
        files_failed: outcome.failed_files.len() as u64,
        dirs_failed: outcome.failed_dirs.len() as u64,
        bytes_freed: outcome.bytes_freed,
        elapsed_ms: elapsed.as_millis().try_into().unwrap_or(u64::MAX),
    }
}
