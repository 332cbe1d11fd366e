//! Error taxonomy for archive builds.
//!
//! Usage and interpreter errors are detected before any external process
//! runs. Everything else happens once staging has started.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Message for an empty installer argument list.
pub const NO_INSTALLER_ARGS: &str =
    "no arguments supplied: you must supply installer arguments so that your dependencies can be installed";

/// Message for a missing `--output-file`.
pub const NO_OUTPUT_FILE: &str =
    "no output file supplied: you must provide an output file with --output-file/-o";

/// Rejected before the installer is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("{}", NO_INSTALLER_ARGS)]
    NoInstallerArgs,

    #[error("{}", NO_OUTPUT_FILE)]
    NoOutputFile,

    #[error("disallowed argument {arg}: {reason}")]
    Disallowed { arg: String, reason: String },
}

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("could not find host interpreter '{name}' on PATH: {source}")]
    HostNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("invalid interpreter path {}: no such file", .0.display())]
    NotFound(PathBuf),

    #[error("invalid interpreter path {}: not an executable file", .0.display())]
    NotExecutable(PathBuf),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),

    #[error("installer failed (exit code {code})")]
    InstallFailed { code: i32 },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "compiled extensions {first} and {second} both provide module '{module}'"
    )]
    SharedObjectCollision {
        module: String,
        first: String,
        second: String,
    },

    #[error("console script '{0}' not found in any installed package")]
    ConsoleScriptNotFound(String),

    #[error("bootstrap descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuildError {
    /// Attach a description of what was being done to an I/O error.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    ///
    /// Installer failures keep the installer's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InstallFailed { code } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Shorthand for mapping `io::Result` into `BuildError::Io`.
pub trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, BuildError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, BuildError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| BuildError::io(f(), e))
    }
}
