//! End-to-end pipeline coverage: resolve -> scan -> plan -> execute ->
//! aggregate against a real temporary project tree.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use buildsweep_core::{
    aggregate, build_plan, resolve, run_scan, CleanError, DeletionExecutor, ExecutionMode,
    RecoverableStore,
};
use tempfile::TempDir;

/// Test stand-in for the OS trash.
struct RemovingStore;

impl RecoverableStore for RemovingStore {
    fn move_to_recoverable_storage(&self, path: &Path) -> Result<(), CleanError> {
        let result = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|err| CleanError::from_io(&err, path))
    }
}

fn write_file(path: &Path, bytes: usize) {
    fs::File::create(path)
        .unwrap()
        .write_all(&vec![b'x'; bytes])
        .unwrap();
}

fn node_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("package.json"), 2);
    write_file(&dir.path().join("keep.txt"), 5);
    write_file(&dir.path().join("npm-debug.log"), 30);

    let node_modules = dir.path().join("node_modules");
    fs::create_dir_all(node_modules.join("pkg")).unwrap();
    write_file(&node_modules.join("pkg").join("index.js"), 70);

    let dist = dir.path().join("dist");
    fs::create_dir(&dist).unwrap();
    write_file(&dist.join("bundle.js"), 100);
    dir
}

#[test]
fn dry_run_pipeline_reports_without_mutating() {
    let dir = node_project();
    let profile = resolve(dir.path(), None, &["*.log".to_string()]).unwrap();

    let scan = run_scan(&[dir.path().to_path_buf()], &profile).unwrap();
    assert_eq!(scan.matched_folders.len(), 2);
    assert_eq!(scan.matched_files, vec![dir.path().join("npm-debug.log")]);
    assert_eq!(scan.total_matched_size, 200);

    let plan = build_plan(&scan);
    let started = Instant::now();
    let outcome = DeletionExecutor::new(&RemovingStore)
        .execute(&plan, ExecutionMode::DryRun)
        .unwrap();
    let stats = aggregate(&scan, &outcome, started.elapsed());

    assert_eq!(stats.dirs_matched, 2);
    assert_eq!(stats.files_matched, 1);
    assert_eq!(stats.dirs_deleted, 2);
    assert_eq!(stats.files_deleted, 1);
    assert_eq!(stats.bytes_freed, 200);

    assert!(dir.path().join("node_modules").exists());
    assert!(dir.path().join("dist").exists());
    assert!(dir.path().join("npm-debug.log").exists());

    // Unchanged filesystem, identical second pass.
    let rescan = run_scan(&[dir.path().to_path_buf()], &profile).unwrap();
    assert_eq!(scan, rescan);
}

#[test]
fn batch_pipeline_removes_matches_and_spares_the_rest() {
    let dir = node_project();
    let profile = resolve(dir.path(), None, &[]).unwrap();

    let scan = run_scan(&[dir.path().to_path_buf()], &profile).unwrap();
    let plan = build_plan(&scan);
    let started = Instant::now();
    let outcome = DeletionExecutor::new(&RemovingStore)
        .execute(&plan, ExecutionMode::Batch)
        .unwrap();
    let stats = aggregate(&scan, &outcome, started.elapsed());

    assert_eq!(stats.dirs_deleted, 2);
    assert_eq!(stats.dirs_failed, 0);
    assert!(!dir.path().join("node_modules").exists());
    assert!(!dir.path().join("dist").exists());
    assert!(dir.path().join("keep.txt").exists());
    assert!(dir.path().join("package.json").exists());
}

#[test]
fn multiple_roots_are_processed_in_caller_order() {
    let first = node_project();
    let second = node_project();
    let profile = resolve(first.path(), None, &[]).unwrap();

    let scan = run_scan(
        &[first.path().to_path_buf(), second.path().to_path_buf()],
        &profile,
    )
    .unwrap();

    assert_eq!(scan.matched_folders.len(), 4);
    let first_matches: Vec<_> = scan
        .matched_folders
        .iter()
        .take_while(|path| path.starts_with(first.path()))
        .collect();
    assert_eq!(first_matches.len(), 2, "first root's matches come first");
    assert_eq!(scan.total_matched_size, 340);
}
