//! Core pipeline for locating and removing disposable build artifacts:
//! rule resolution, filesystem scan, plan construction, safety-checked
//! recoverable deletion, and statistics aggregation. All terminal I/O,
//! argument parsing, config-file parsing, and OS trash plumbing belong to
//! the caller.

pub mod error;
pub mod execute;
pub mod model;
pub mod pattern;
pub mod plan;
pub mod profile;
pub mod report;
pub mod scan;

pub use error::CleanError;
pub use execute::{
    check_safety, ConfirmationSource, DeletionExecutor, RecoverableStore, PROTECTED_ROOTS,
};
pub use model::{
    CleanProfile, CleaningRule, Decision, DeletionOutcome, DeletionPlan, ExecutionMode,
    ScanOptions, ScanResult, Stats,
};
pub use pattern::matches;
pub use plan::build_plan;
pub use profile::{
    default_rules, detect_project_type, expand_tilde, resolve, validate_root, ProjectType,
};
pub use report::aggregate;
pub use scan::{directory_size, run_scan, run_scan_with_progress, ScanProgress};
