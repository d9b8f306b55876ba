//! File synchronization between a package directory and a working directory.
//!
//! Every operation works one file at a time, in manifest order, and never
//! stops early: a failure is recorded against the file it concerns and the
//! next file is processed.

use anyhow::Result;
use log::{info, warn};
use std::path::Path;

use crate::runtime::{Runtime, is_not_found};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Copied,
    Removed,
    /// The file was already gone when we tried to remove it.
    AlreadyAbsent,
    Failed(String),
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, FileStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: String,
    pub status: FileStatus,
}

impl FileOutcome {
    fn new(name: &str, status: FileStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }

    fn from_result<T>(name: &str, result: Result<T>, ok: FileStatus) -> Self {
        match result {
            Ok(_) => Self::new(name, ok),
            Err(e) => Self::new(name, FileStatus::Failed(format!("{:#}", e))),
        }
    }
}

/// Per-file outcomes of one synchronization, in the order they were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<FileOutcome>,
}

impl SyncReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    fn all_failed<'n>(names: impl IntoIterator<Item = &'n str>, reason: &str) -> Self {
        let outcomes = names
            .into_iter()
            .map(|name| FileOutcome::new(name, FileStatus::Failed(reason.to_string())))
            .collect();
        Self { outcomes }
    }
}

/// Reason recorded when a copy would read and truncate the same file.
pub const SAME_FILE: &str = "source and destination are the same file";

/// Copy `src_dir/<name>` to `dest_dir/<name>` for every name, overwriting
/// existing destination files.
///
/// When both directories resolve to the same place nothing is copied and
/// every file is reported as failed.
#[tracing::instrument(skip(runtime, names))]
pub fn copy_into<'n, R: Runtime>(
    runtime: &R,
    src_dir: &Path,
    dest_dir: &Path,
    names: impl IntoIterator<Item = &'n str>,
) -> SyncReport {
    if same_directory(runtime, src_dir, dest_dir) {
        warn!("Refusing to copy {:?} onto itself", src_dir);
        return SyncReport::all_failed(names, SAME_FILE);
    }

    let outcomes = names
        .into_iter()
        .map(|name| {
            let from = src_dir.join(name);
            let to = dest_dir.join(name);
            let outcome =
                FileOutcome::from_result(name, runtime.copy(&from, &to), FileStatus::Copied);
            log_outcome(&outcome, "copy");
            outcome
        })
        .collect();
    SyncReport { outcomes }
}

/// Copy files out of a working directory into a package directory, creating
/// the destination tree first.
#[tracing::instrument(skip(runtime, names))]
pub fn copy_out_of<'n, R: Runtime>(
    runtime: &R,
    src_dir: &Path,
    dest_dir: &Path,
    names: impl IntoIterator<Item = &'n str>,
) -> SyncReport {
    if !runtime.is_dir(dest_dir)
        && let Err(e) = runtime.create_dir_all(dest_dir)
    {
        warn!("Failed to create {:?}: {:#}", dest_dir, e);
        return SyncReport::all_failed(names, &format!("{:#}", e));
    }

    copy_into(runtime, src_dir, dest_dir, names)
}

/// Remove `target_dir/<name>` for every name. Files that are already gone
/// count as removed.
#[tracing::instrument(skip(runtime, names))]
pub fn remove_matching<'n, R: Runtime>(
    runtime: &R,
    target_dir: &Path,
    names: impl IntoIterator<Item = &'n str>,
) -> SyncReport {
    let outcomes = names
        .into_iter()
        .map(|name| {
            let outcome = match runtime.remove_file(&target_dir.join(name)) {
                Ok(()) => FileOutcome::new(name, FileStatus::Removed),
                Err(e) if is_not_found(&e) => FileOutcome::new(name, FileStatus::AlreadyAbsent),
                Err(e) => FileOutcome::new(name, FileStatus::Failed(format!("{:#}", e))),
            };
            log_outcome(&outcome, "remove");
            outcome
        })
        .collect();
    SyncReport { outcomes }
}

/// True when both paths exist and canonicalize to the same directory.
fn same_directory<R: Runtime>(runtime: &R, a: &Path, b: &Path) -> bool {
    match (runtime.canonicalize(a), runtime.canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn log_outcome(outcome: &FileOutcome, op: &str) {
    match &outcome.status {
        FileStatus::Failed(reason) => warn!("Failed to {} {}: {}", op, outcome.name, reason),
        status => info!("{} {}: {:?}", op, outcome.name, status),
    }
}
