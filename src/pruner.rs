//! Depth-first sweep that removes matched directories and descends into everything else.

use crate::patterns::DeletionSet;
use crate::remove::{force_remove_dir_all, Removal};

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A matched directory that could not be removed
#[derive(Debug)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Result of one sweep over a root directory
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Matched directories that were removed, in removal order
    pub deleted: Vec<PathBuf>,
    /// Matched directories whose removal failed; the sweep continued past them
    pub failed: Vec<RemovalFailure>,
    /// Number of non-matched directories that were listed, the root included
    pub visited_dirs: usize,
}

impl PruneReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// True when the sweep found nothing to remove and nothing failed
    pub fn is_clean(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty()
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        let count = self.deleted.len();
        let noun = if count == 1 { "directory" } else { "directories" };
        let mut line = format!("Removed {} {}", count, noun);
        if !self.failed.is_empty() {
            line.push_str(&format!(", {} could not be removed", self.failed.len()));
        }
        line
    }
}

/// Sweep `root`, removing every directory whose name is in `deletion_set`.
///
/// A matched directory is removed as a unit and never listed. Every other
/// directory is descended into. Files and symlinks are left alone, and the
/// root itself is never removed.
///
/// A missing root is an empty sweep. Failures while removing a matched
/// directory are recorded in the report and the sweep moves on. Failures while
/// listing any other directory abort the sweep and are returned.
pub fn prune(root: &Path, deletion_set: &DeletionSet) -> Result<PruneReport> {
    prune_with(root, deletion_set, |_| {})
}

/// Same as [`prune`], calling `on_removed` right after each matched directory is removed
pub fn prune_with<F>(root: &Path, deletion_set: &DeletionSet, on_removed: F) -> Result<PruneReport>
where
    F: FnMut(&Path),
{
    sweep(root, deletion_set, force_remove_dir_all, on_removed)
}

fn sweep<R, F>(
    root: &Path,
    deletion_set: &DeletionSet,
    mut remove: R,
    mut on_removed: F,
) -> Result<PruneReport>
where
    R: FnMut(&Path) -> io::Result<Removal>,
    F: FnMut(&Path),
{
    let mut report = PruneReport::default();

    match fs::symlink_metadata(root) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(root = %root.display(), "root does not exist, nothing to clean");
            return Ok(report);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Could not get metadata for {}", root.display()))
        }
    }

    info!(
        root = %root.display(),
        build_systems = ?deletion_set.build_systems().collect::<Vec<_>>(),
        names = deletion_set.len(),
        "starting sweep"
    );

    let mut frontier: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = frontier.pop() {
        report.visited_dirs += 1;
        debug!(path = %dir.display(), "listing directory");

        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;

            // file_type() does not follow symlinks, so a link to a directory is a leaf
            let file_type = entry
                .file_type()
                .with_context(|| format!("Could not get file type for {}", entry.path().display()))?;
            if !file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if !deletion_set.contains(&entry.file_name()) {
                frontier.push(path);
                continue;
            }

            match remove(&path) {
                Ok(Removal::Removed) => {
                    on_removed(&path);
                    report.deleted.push(path);
                }
                Ok(Removal::AlreadyGone) => {
                    debug!(path = %path.display(), "already removed");
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "could not remove directory, skipping");
                    report.failed.push(RemovalFailure { path, error });
                }
            }
        }
    }

    info!(
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        visited = report.visited_dirs,
        "sweep finished"
    );

    Ok(report)
}
