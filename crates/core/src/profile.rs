//! Rule resolution: project-type defaults, external rule merging, and CLI
//! override patterns collapse into one immutable [`CleanProfile`].

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CleanError;
use crate::model::{CleanProfile, CleaningRule, ScanOptions};

/// Project ecosystem detected from the root directory's marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    NodeJs,
    Rust,
    Python,
    Go,
    Java,
    /// No marker found; a broad fallback rule set applies.
    Generic,
}

/// Ordered marker table. The first marker present among the root's immediate
/// children decides the project type.
const PROJECT_MARKERS: &[(&str, ProjectType)] = &[
    ("package.json", ProjectType::NodeJs),
    ("Cargo.toml", ProjectType::Rust),
    ("go.mod", ProjectType::Go),
    ("pom.xml", ProjectType::Java),
    ("build.gradle", ProjectType::Java),
    ("requirements.txt", ProjectType::Python),
    ("setup.py", ProjectType::Python),
    ("pyproject.toml", ProjectType::Python),
];

/// Detect the project type from one listing of `root`'s immediate children.
/// An unreadable root counts as unmarked.
pub fn detect_project_type(root: &Path) -> ProjectType {
    let names: BTreeSet<String> = match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => return ProjectType::Generic,
    };

    for (marker, project_type) in PROJECT_MARKERS {
        if names.contains(*marker) {
            return *project_type;
        }
    }
    ProjectType::Generic
}

/// Built-in cleaning rules for a project type.
pub fn default_rules(project_type: ProjectType) -> CleaningRule {
    let (folders, files): (&[&str], &[&str]) = match project_type {
        ProjectType::NodeJs => (&["node_modules", "dist", "build", ".next"], &[]),
        ProjectType::Rust => (&["target"], &[]),
        ProjectType::Python => (&["__pycache__"], &["*.pyc"]),
        ProjectType::Go => (&["vendor", "bin"], &[]),
        ProjectType::Java => (&["target", "build"], &[]),
        ProjectType::Generic => (&["node_modules", "dist", "build", "target"], &[]),
    };

    CleaningRule {
        folders: folders.iter().map(|name| name.to_string()).collect(),
        files: files.iter().map(|name| name.to_string()).collect(),
    }
}

/// Produce the final profile for a run.
///
/// Built-in defaults for the detected project type are unioned with
/// `external` rules and exclusions; external options win field-by-field where
/// present. `cli_patterns` are purely additive: a trailing `/` marks a folder
/// rule (separator stripped), anything else a file rule. Fails with
/// [`CleanError::EmptyRuleSet`] when the merged rule sets are both empty.
pub fn resolve(
    root: &Path,
    external: Option<&CleanProfile>,
    cli_patterns: &[String],
) -> Result<CleanProfile, CleanError> {
    validate_root(root)?;

    let project_type = detect_project_type(root);
    debug!(?project_type, root = %root.display(), "resolved project type");

    let mut profile = CleanProfile {
        rules: default_rules(project_type),
        exclude: Vec::new(),
        options: ScanOptions::default(),
    };

    if let Some(external) = external {
        profile
            .rules
            .folders
            .extend(external.rules.folders.iter().cloned());
        profile
            .rules
            .files
            .extend(external.rules.files.iter().cloned());
        profile
            .exclude
            .extend(external.exclude.iter().map(|path| expand_tilde(path)));
        profile.options = profile.options.merged_with(&external.options);
    }

    for pattern in cli_patterns {
        match pattern.strip_suffix('/') {
            Some(folder) => {
                profile.rules.folders.insert(folder.to_string());
            }
            None => {
                profile.rules.files.insert(pattern.clone());
            }
        }
    }

    if profile.rules.is_empty() {
        return Err(CleanError::EmptyRuleSet);
    }

    Ok(profile)
}

/// Expand a leading `~` or `~/` to the user's home directory. Other `~` forms
/// (`~user`) pass through untouched.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    if raw != "~" && !raw.starts_with("~/") {
        return path.to_path_buf();
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let home = PathBuf::from(home);
    if raw == "~" {
        home
    } else {
        home.join(&raw[2..])
    }
}

/// Roots must exist before a scan starts; a missing root cannot yield a valid
/// plan.
pub fn validate_root(path: &Path) -> Result<(), CleanError> {
    if !path.exists() {
        return Err(CleanError::PathNotFound(path.to_path_buf()));
    }
    Ok(())
}
