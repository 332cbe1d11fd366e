//! Scoped staging directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{BuildError, IoContext};

/// Name of the installer target inside a staging directory.
pub const SITE_PACKAGES: &str = "site-packages";

/// A fresh work directory that is removed when dropped.
///
/// Dropping happens on success, on `?` returns and while unwinding, so a
/// failed build never leaves its staging tree behind.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    /// Create a staging directory under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("zipstrap-staging-");
        let dir = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .io_context(|| format!("failed to create staging dir in {}", parent.display()))?,
            None => builder
                .tempdir()
                .io_context(|| "failed to create staging dir")?,
        };
        tracing::debug!("Staging in {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Installer target directory.
    pub fn site_packages(&self) -> PathBuf {
        self.dir.path().join(SITE_PACKAGES)
    }

    /// Remove the directory now, reporting failures.
    pub fn cleanup(self) -> Result<(), BuildError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .io_context(|| format!("failed to remove staging dir {}", path.display()))
    }
}
