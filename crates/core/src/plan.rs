//! Deterministic conversion of a [`ScanResult`] into an ordered
//! [`DeletionPlan`]. Pure, no I/O.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use crate::model::{DeletionPlan, ScanResult};

/// Build the deletion work list.
///
/// Files carry no ordering dependency and are taken as scanned. Directories
/// are sorted deepest-first (descending component count, equal depths broken
/// lexicographically), so a descendant always precedes its ancestor even if a
/// caller hands in nested folders.
pub fn build_plan(scan: &ScanResult) -> DeletionPlan {
    let mut dirs: Vec<PathBuf> = scan.matched_folders.clone();
    dirs.sort_by_key(|dir| (Reverse(path_depth(dir)), dir.clone()));

    DeletionPlan {
        files: scan.matched_files.clone(),
        dirs,
    }
}

fn path_depth(path: &Path) -> usize {
    path.components().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_with_folders(folders: &[&str]) -> ScanResult {
        ScanResult {
            matched_folders: folders.iter().map(PathBuf::from).collect(),
            ..ScanResult::default()
        }
    }

    #[test]
    fn directories_come_out_deepest_first() {
        let scan = scan_with_folders(&["/a/b", "/a/b/c/d", "/a/b/c"]);
        let plan = build_plan(&scan);

        assert_eq!(
            plan.dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
            ]
        );

        // Non-increasing depth across the whole sequence.
        let depths: Vec<usize> = plan.dirs.iter().map(|d| path_depth(d)).collect();
        assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn equal_depths_break_lexicographically() {
        let scan = scan_with_folders(&["/x/zeta", "/x/alpha", "/x/mid"]);
        let plan = build_plan(&scan);
        assert_eq!(
            plan.dirs,
            vec![
                PathBuf::from("/x/alpha"),
                PathBuf::from("/x/mid"),
                PathBuf::from("/x/zeta"),
            ]
        );
    }

    #[test]
    fn files_pass_through_unordered_and_untouched() {
        let scan = ScanResult {
            matched_files: vec![PathBuf::from("/p/b.log"), PathBuf::from("/p/a.log")],
            ..ScanResult::default()
        };
        let plan = build_plan(&scan);
        assert_eq!(
            plan.files,
            vec![PathBuf::from("/p/b.log"), PathBuf::from("/p/a.log")]
        );
        assert!(plan.dirs.is_empty());
    }

    #[test]
    fn plan_is_deterministic_for_a_given_input() {
        let scan = scan_with_folders(&["/a/b/c", "/a/x", "/a/b", "/a/y/z"]);
        assert_eq!(build_plan(&scan), build_plan(&scan));
    }
}
