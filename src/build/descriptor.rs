//! Bootstrap descriptor (`environment.json`) and build identity.
//!
//! The build id is a SHA-256 over the staged tree, so rebuilding from the
//! same inputs yields the same id and the same runtime cache directory.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::common::{write_file_with_dirs, SITE_PACKAGES};
use crate::error::{BuildError, IoContext};
use crate::native::SharedObjectMap;

/// File name of the descriptor inside the archive.
pub const DESCRIPTOR_NAME: &str = "environment.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub build_id: String,
    /// `module:callable`; `None` starts an interactive console.
    pub entry_point: Option<String>,
    pub shebang: String,
    /// Archive directory holding the installed packages.
    pub site_packages: String,
    #[serde(default)]
    pub shared_objects: SharedObjectMap,
}

impl Descriptor {
    pub fn new(
        build_id: String,
        entry_point: Option<String>,
        shebang: String,
        shared_objects: SharedObjectMap,
    ) -> Self {
        Self {
            build_id,
            entry_point,
            shebang,
            site_packages: SITE_PACKAGES.to_string(),
            shared_objects,
        }
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, BuildError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Write `environment.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<(), BuildError> {
        write_file_with_dirs(dir.join(DESCRIPTOR_NAME), self.to_json()?)
    }
}

/// Hash every file under `root` (relative path and contents) plus `salt`.
pub fn build_id(root: &Path, salt: &str) -> Result<String, BuildError> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .map_err(|e| BuildError::io(format!("failed to hash {}", root.display()), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        hasher.update([0u8]);
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);

        let mut file = File::open(entry.path())
            .io_context(|| format!("failed to open {}", entry.path().display()))?;
        io::copy(&mut file, &mut hasher)
            .io_context(|| format!("failed to read {}", entry.path().display()))?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}
