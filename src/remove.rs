//! Best-effort forced removal of a whole directory subtree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of a forced removal that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The subtree existed and is now gone
    Removed,
    /// Nothing was there to remove
    AlreadyGone,
}

/// Remove `path` and everything below it, like `rm -rf`.
///
/// A missing target is not an error. If removal is blocked by permissions,
/// owner access is restored on every member of the subtree and the removal
/// is retried once. Any error left after that is returned to the caller.
pub fn force_remove_dir_all(path: &Path) -> io::Result<Removal> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(Removal::Removed),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Removal::AlreadyGone),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), error = %err, "retrying removal after restoring write access");
            make_writable(path);
            match fs::remove_dir_all(path) {
                Ok(()) => Ok(Removal::Removed),
                // The first attempt already took the rest of the tree
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Removal::Removed),
                Err(err) => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// Restore owner access on a subtree without following symlinks. Errors are ignored;
/// whatever still blocks removal surfaces on the retry.
fn make_writable(root: &Path) {
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(path) = pending.pop() {
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            continue;
        };
        if metadata.is_symlink() {
            continue;
        }

        let is_dir = metadata.is_dir();
        grant_owner_access(&path, metadata.permissions(), is_dir);

        if is_dir {
            if let Ok(entries) = fs::read_dir(&path) {
                pending.extend(entries.flatten().map(|entry| entry.path()));
            }
        }
    }
}

// Unlinking on unix depends only on the parent directory's mode.
#[cfg(unix)]
fn grant_owner_access(path: &Path, mut permissions: fs::Permissions, is_dir: bool) {
    use std::os::unix::fs::PermissionsExt;

    if !is_dir {
        return;
    }
    let mode = permissions.mode();
    if mode & 0o700 != 0o700 {
        permissions.set_mode(mode | 0o700);
        let _ = fs::set_permissions(path, permissions);
    }
}

#[cfg(not(unix))]
fn grant_owner_access(path: &Path, mut permissions: fs::Permissions, _is_dir: bool) {
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        let _ = fs::set_permissions(path, permissions);
    }
}
