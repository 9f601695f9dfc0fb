mod interactive;
mod store;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use buildsweep_core::{
    aggregate, build_plan, expand_tilde, resolve, run_scan, run_scan_with_progress, CleanError,
    CleanProfile, DeletionExecutor, DeletionOutcome, ExecutionMode, ScanOptions, ScanResult, Stats,
};
use interactive::PromptConfirmation;
use store::SystemTrash;

#[derive(Debug, Parser)]
#[command(
    name = "buildsweep",
    version,
    about = "Locate disposable build artifacts and move them to the system trash."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan roots and report what would be removed, without touching anything.
    Scan(ScanArgs),
    /// Remove matched artifacts by moving them to recoverable storage.
    Clean(CleanArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Root paths to scan. `~` expands to the home directory.
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// JSON rule file merged over the built-in project defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional cleaning patterns; a trailing `/` marks a folder rule.
    #[arg(long = "pattern", short = 'p', value_name = "PATTERN", action = ArgAction::Append)]
    patterns: Vec<String>,

    /// Path prefixes to leave untouched (repeatable).
    #[arg(long = "exclude", value_name = "PATH", action = ArgAction::Append)]
    exclude: Vec<PathBuf>,

    /// Skip files smaller than this many bytes.
    #[arg(long, value_name = "BYTES")]
    min_size: Option<u64>,

    /// Skip files larger than this many bytes.
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Skip files modified more recently than this many days ago.
    #[arg(long, value_name = "DAYS")]
    min_age_days: Option<u32>,

    /// Skip files modified longer ago than this many days.
    #[arg(long, value_name = "DAYS")]
    max_age_days: Option<u32>,

    /// Only inspect the immediate children of each root.
    #[arg(long)]
    no_recursive: bool,

    /// Traverse into symlinked directories.
    #[arg(long)]
    follow_symlinks: bool,

    /// Print running counters while scanning.
    #[arg(long)]
    progress: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Write the scan report as JSON to this file.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CleanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Confirm each item before it is removed.
    #[arg(long, short = 'i')]
    interactive: bool,
}

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    stats: &'a Stats,
    scan: &'a ScanResult,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan_command(args),
        Commands::Clean(args) => run_clean_command(args),
    }
}

fn run_scan_command(args: ScanArgs) -> Result<()> {
    let started = Instant::now();
    let (scan, _) = prepare(&args.common)?;

    let plan = build_plan(&scan);
    let outcome = DeletionExecutor::new(&SystemTrash).execute(&plan, ExecutionMode::DryRun)?;
    let stats = aggregate(&scan, &outcome, started.elapsed());

    for dir in &scan.matched_folders {
        println!("would remove directory {}", dir.display());
    }
    for file in &scan.matched_files {
        println!("would remove file {}", file.display());
    }
    print_summary(&stats, &outcome, true);

    if let Some(output) = args.output {
        let report = ScanReport {
            stats: &stats,
            scan: &scan,
        };
        let payload =
            serde_json::to_string_pretty(&report).context("failed to serialize scan report")?;
        fs::write(&output, payload)
            .with_context(|| format!("failed to write report to {}", output.display()))?;
        println!("Report written to {}", output.display());
    }

    Ok(())
}

fn run_clean_command(args: CleanArgs) -> Result<()> {
    let started = Instant::now();
    let (scan, _) = prepare(&args.common)?;
    let plan = build_plan(&scan);

    let result = if args.interactive {
        let mut prompt = PromptConfirmation;
        DeletionExecutor::with_confirmation(&SystemTrash, &mut prompt)
            .execute(&plan, ExecutionMode::Interactive)
    } else {
        DeletionExecutor::new(&SystemTrash).execute(&plan, ExecutionMode::Batch)
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(CleanError::UserCancelled) => {
            println!("Aborted; remaining items were left untouched.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let stats = aggregate(&scan, &outcome, started.elapsed());
    print_summary(&stats, &outcome, false);
    Ok(())
}

/// Resolve the profile from defaults, config file, and flags, then scan.
fn prepare(args: &CommonArgs) -> Result<(ScanResult, CleanProfile)> {
    let roots: Vec<PathBuf> = args.paths.iter().map(|path| expand_tilde(path)).collect();

    let external = match &args.config {
        Some(config) => {
            let data = fs::read_to_string(config)
                .with_context(|| format!("failed to read {}", config.display()))?;
            let profile: CleanProfile = serde_json::from_str(&data)
                .with_context(|| format!("failed to parse {}", config.display()))?;
            Some(profile)
        }
        None => None,
    };

    let mut profile = resolve(&roots[0], external.as_ref(), &args.patterns)?;
    tracing::debug!(
        folders = profile.rules.folders.len(),
        files = profile.rules.files.len(),
        "resolved cleaning profile"
    );
    profile.exclude.extend(args.exclude.iter().map(|path| expand_tilde(path)));
    profile.options = profile.options.merged_with(&ScanOptions {
        recursive: args.no_recursive.then_some(false),
        follow_symlinks: args.follow_symlinks.then_some(true),
        min_size: args.min_size,
        max_size: args.max_size,
        min_age_days: args.min_age_days,
        max_age_days: args.max_age_days,
    });

    let scan = if args.progress {
        run_scan_with_progress(&roots, &profile, |progress| {
            // Throttled so huge trees do not flood the terminal.
            if (progress.dirs_visited + progress.files_visited) % 500 == 0 {
                eprint!(
                    "\rscanned {} dir(s), {} file(s); matched {} ({})",
                    progress.dirs_visited,
                    progress.files_visited,
                    progress.dirs_matched + progress.files_matched,
                    human_bytes(progress.matched_bytes)
                );
            }
        })
        .map(|scan| {
            eprintln!();
            scan
        })?
    } else {
        run_scan(&roots, &profile)?
    };

    Ok((scan, profile))
}

fn print_summary(stats: &Stats, outcome: &DeletionOutcome, dry_run: bool) {
    println!(
        "Scanned {} director(ies) and {} file(s) in {} ms.",
        stats.dirs_scanned, stats.files_scanned, stats.elapsed_ms
    );
    println!(
        "Matched {} director(ies) and {} file(s).",
        stats.dirs_matched, stats.files_matched
    );
    if dry_run {
        println!(
            "Would free {}. Run `buildsweep clean` to actually remove.",
            human_bytes(stats.bytes_freed)
        );
        return;
    }

    println!(
        "Removed {} director(ies) and {} file(s); freed {}.",
        stats.dirs_deleted,
        stats.files_deleted,
        human_bytes(stats.bytes_freed)
    );

    if stats.files_failed > 0 || stats.dirs_failed > 0 {
        println!(
            "Failed to remove {} file(s) and {} director(ies):",
            stats.files_failed, stats.dirs_failed
        );
        for (path, reason) in outcome.failed_files.iter().chain(&outcome.failed_dirs) {
            println!("- {}: {reason}", path.display());
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn human_bytes(value: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if value == 0 {
        return "0 B".to_string();
    }
    let mut size = value as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
