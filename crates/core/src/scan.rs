//! Depth-first traversal that turns a [`CleanProfile`] into a [`ScanResult`].
//!
//! Roots are walked strictly in caller order, one at a time. A directory whose
//! name matches a folder rule is recorded, sized, and pruned: nothing inside
//! it is visited, counted, or matched again. Unreadable entries are skipped
//! silently and only show up as reduced counts.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::CleanError;
use crate::model::{CleanProfile, ScanOptions, ScanResult};
use crate::pattern;
use crate::profile::{expand_tilde, validate_root};

/// Running counters handed to a progress sink after every visited node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub dirs_visited: u64,
    pub files_visited: u64,
    pub dirs_matched: u64,
    pub files_matched: u64,
    pub matched_bytes: u64,
}

/// Scan `roots` against `profile` without progress reporting.
pub fn run_scan(roots: &[PathBuf], profile: &CleanProfile) -> Result<ScanResult, CleanError> {
    run_scan_with_progress(roots, profile, |_| {})
}

/// Scan `roots` against `profile`, invoking `on_progress` synchronously after
/// each visited node. The sink observes counters only; it cannot influence the
/// scan.
pub fn run_scan_with_progress<F>(
    roots: &[PathBuf],
    profile: &CleanProfile,
    mut on_progress: F,
) -> Result<ScanResult, CleanError>
where
    F: FnMut(&ScanProgress),
{
    let roots: Vec<PathBuf> = roots.iter().map(|root| expand_tilde(root)).collect();
    for root in &roots {
        validate_root(root)?;
    }

    let mut result = ScanResult::default();
    for root in &roots {
        scan_root(root, profile, &mut result, &mut on_progress);
        debug!(
            root = %root.display(),
            dirs = result.total_dirs_visited,
            files = result.total_files_visited,
            "scan root complete"
        );
    }
    Ok(result)
}

fn scan_root<F>(root: &Path, profile: &CleanProfile, result: &mut ScanResult, on_progress: &mut F)
where
    F: FnMut(&ScanProgress),
{
    let options = &profile.options;
    let max_depth = if options.recursive() { usize::MAX } else { 1 };
    let now = Utc::now();

    let mut walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks())
        .max_depth(max_depth)
        .into_iter();

    loop {
        let entry = match walker.next() {
            None => break,
            Some(Err(_)) => continue,
            Some(Ok(entry)) => entry,
        };
        // The root itself is the search origin, never a candidate.
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        if is_excluded(path, &profile.exclude) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");

        if entry.file_type().is_dir() {
            result.total_dirs_visited += 1;

            if matches_any(&profile.rules.folders, name, true) {
                // Atomic unit: size it now, then never descend into it.
                result.total_matched_size = result
                    .total_matched_size
                    .saturating_add(directory_size(path));
                result.matched_folders.push(path.to_path_buf());
                walker.skip_current_dir();
            }
            on_progress(&progress_snapshot(result));
        } else if entry.file_type().is_file() {
            result.total_files_visited += 1;

            let matched = entry.metadata().ok().and_then(|metadata| {
                let size = metadata.len();
                if !passes_size_filter(size, options) || !passes_age_filter(&metadata, options, now)
                {
                    return None;
                }
                matches_any(&profile.rules.files, name, false).then_some(size)
            });
            if let Some(size) = matched {
                result.total_matched_size = result.total_matched_size.saturating_add(size);
                result.matched_files.push(path.to_path_buf());
            }
            on_progress(&progress_snapshot(result));
        }
        // Anything else (unfollowed symlinks, sockets, ...) is skipped.
    }
}

fn progress_snapshot(result: &ScanResult) -> ScanProgress {
    ScanProgress {
        dirs_visited: result.total_dirs_visited,
        files_visited: result.total_files_visited,
        dirs_matched: result.matched_folders.len() as u64,
        files_matched: result.matched_files.len() as u64,
        matched_bytes: result.total_matched_size,
    }
}

fn matches_any<'a, I>(rules: I, name: &str, folder: bool) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    rules.into_iter().any(|rule| {
        if folder {
            // Folder rules are stored bare; match them as exact names.
            rule == name
        } else {
            pattern::matches(rule, name)
        }
    })
}

/// A path is excluded when it equals or sits under any exclusion prefix.
fn is_excluded(path: &Path, excludes: &[PathBuf]) -> bool {
    excludes.iter().any(|exclude| path.starts_with(exclude))
}

fn passes_size_filter(size: u64, options: &ScanOptions) -> bool {
    if options.min_size.is_some_and(|min| size < min) {
        return false;
    }
    if options.max_size.is_some_and(|max| size > max) {
        return false;
    }
    true
}

/// Age filters compare against modification time, inclusive on both ends.
/// Files with unreadable timestamps pass, matching the "no constraint"
/// reading of the options.
fn passes_age_filter(
    metadata: &std::fs::Metadata,
    options: &ScanOptions,
    now: DateTime<Utc>,
) -> bool {
    if options.min_age_days.is_none() && options.max_age_days.is_none() {
        return true;
    }
    let Ok(modified) = metadata.modified() else {
        return true;
    };
    let age_days = (now - DateTime::<Utc>::from(modified)).num_days();

    if options.min_age_days.is_some_and(|min| age_days < i64::from(min)) {
        return false;
    }
    if options.max_age_days.is_some_and(|max| age_days > i64::from(max)) {
        return false;
    }
    true
}

/// Best-effort recursive size of a directory's file contents. Unreadable
/// entries contribute zero.
pub fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .fold(0_u64, |total, metadata| total.saturating_add(metadata.len()))
}
