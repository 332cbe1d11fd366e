//! Centralized command execution with consistent error handling.
//!
//! The package installer is started through `Cmd`, so a launch failure
//! carries the program name.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Builder for configuring command execution.
pub struct Cmd {
    program: PathBuf,
    args: Vec<OsString>,
    /// If true, don't fail on non-zero exit.
    allow_fail: bool,
}

impl Cmd {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            allow_fail: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().into());
        }
        self
    }

    /// Add a path as an argument without lossy conversion.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_owned());
        self
    }

    /// Leave the exit status to the caller.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Run the command with inherited stdio.
    ///
    /// Output goes directly to the terminal, so the user sees installer
    /// progress and diagnostics as they happen.
    pub fn run_interactive(self) -> Result<ExitStatus> {
        tracing::debug!("Running {} {:?}", self.program.display(), self.args);

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| {
                format!(
                    "Failed to execute '{}'. Is it installed?",
                    self.program.display()
                )
            })?;

        if !self.allow_fail && !status.success() {
            bail!(
                "'{}' failed (exit code {})",
                self.program.display(),
                status.code().unwrap_or(-1)
            );
        }

        Ok(status)
    }
}
