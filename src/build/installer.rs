//! The package installer collaborator.

use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::preflight::HostInterpreter;
use crate::process::Cmd;

/// Arguments always passed to pip ahead of the user's.
pub const PIP_DEFAULT_ARGS: &[&str] = &["--disable-pip-version-check", "--no-warn-script-location"];

/// Installs packages into a target directory.
///
/// Implementations only report pass/fail; their diagnostics go straight
/// to the user.
pub trait Installer {
    fn install(&self, target: &Path, args: &[String]) -> Result<(), BuildError>;
}

/// `<python> -m pip install --target <dir> ...`
#[derive(Debug, Clone)]
pub struct PipInstaller {
    python: PathBuf,
    default_args: Vec<String>,
}

impl PipInstaller {
    pub fn new(host: &HostInterpreter) -> Self {
        Self {
            python: host.path().to_path_buf(),
            default_args: PIP_DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_default_args(mut self, args: Vec<String>) -> Self {
        self.default_args = args;
        self
    }
}

impl Installer for PipInstaller {
    fn install(&self, target: &Path, args: &[String]) -> Result<(), BuildError> {
        tracing::info!("Installing {} into {}", args.join(" "), target.display());

        let status = Cmd::new(&self.python)
            .args(["-m", "pip", "install", "--target"])
            .arg_path(target)
            .args(&self.default_args)
            .args(args)
            .allow_fail()
            .run_interactive()?;

        if !status.success() {
            return Err(BuildError::InstallFailed {
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }
}
