//! File helpers: parent-creating writes, tree copies and atomic replacement.

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BuildError, IoContext};

/// Write a file, creating parent directories as needed.
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), BuildError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .io_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).io_context(|| format!("failed to write {}", path.display()))
}

/// Copy the contents of `src` into `dst`, merging with what is there.
///
/// Symlinks are followed. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            BuildError::io(format!("failed to read {}", src.display()), e.into())
        })?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .io_context(|| format!("failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).io_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Produce `path` with `mode` atomically, writing it through `write`.
///
/// `write` fills a temporary file in the same directory, which is then
/// renamed over `path`. On any failure the temporary file is removed and
/// `path` is left untouched.
pub fn write_atomic<F>(path: &Path, mode: u32, write: F) -> Result<(), BuildError>
where
    F: FnOnce(&mut File) -> Result<(), BuildError>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".zipstrap-")
        .suffix(".part")
        .tempfile_in(parent)
        .io_context(|| format!("failed to create temporary file in {}", parent.display()))?;

    write(tmp.as_file_mut())?;
    tmp.as_file()
        .sync_all()
        .io_context(|| format!("failed to write {}", tmp.path().display()))?;

    fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))
        .io_context(|| format!("failed to set permissions on {}", tmp.path().display()))?;

    tmp.persist(path)
        .map_err(|e| BuildError::io(format!("failed to move archive to {}", path.display()), e.error))?;

    Ok(())
}
