//! Resolve the interpreter line embedded at the top of the archive.

use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::error::InterpreterError;

/// Longest interpreter string the kernel reads after `#!`.
pub const MAX_SHEBANG_LEN: usize = 127;

/// The interpreter that runs the build (and the installer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterpreter {
    path: PathBuf,
}

impl HostInterpreter {
    /// Locate `name` on `PATH`, or use it directly if it is a path.
    pub fn discover(name: &str) -> Result<Self, InterpreterError> {
        let path = which::which(name).map_err(|source| InterpreterError::HostNotFound {
            name: name.to_string(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Executable name without its directory, e.g. `python3`.
    pub fn executable_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Interpreter string written after `#!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shebang(String);

impl Shebang {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full first line of the archive, newline included.
    pub fn line(&self) -> String {
        format!("#!{}\n", self.0)
    }
}

impl fmt::Display for Shebang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn an optional explicit interpreter into a shebang.
///
/// Without one, the host interpreter is referenced through `/usr/bin/env`
/// by name only so the archive stays portable. An explicit path is kept
/// verbatim but must exist and be executable.
pub fn resolve_shebang(
    explicit: Option<&Path>,
    host: &HostInterpreter,
) -> Result<Shebang, InterpreterError> {
    let shebang = match explicit {
        None => Shebang(format!("/usr/bin/env {}", host.executable_name())),
        Some(path) => {
            check_executable(path)?;
            Shebang(path.to_string_lossy().into_owned())
        }
    };

    if shebang.0.len() > MAX_SHEBANG_LEN {
        tracing::warn!(
            "Interpreter line is {} bytes, longer than the {} the kernel reads; the archive may need to be run as `python <archive>`",
            shebang.0.len(),
            MAX_SHEBANG_LEN
        );
    }

    Ok(shebang)
}

fn check_executable(path: &Path) -> Result<(), InterpreterError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(InterpreterError::NotFound(path.to_path_buf()))
        }
        Err(_) => return Err(InterpreterError::NotExecutable(path.to_path_buf())),
    };

    if !metadata.is_file() || metadata.permissions().mode() & 0o111 == 0 {
        return Err(InterpreterError::NotExecutable(path.to_path_buf()));
    }

    Ok(())
}
