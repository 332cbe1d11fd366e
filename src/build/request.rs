//! The validated description of one build.

use std::path::{Path, PathBuf};

use crate::error::UsageError;
use crate::preflight::{gatekeep, Blacklist, VettedArgs};

use super::entry_point::EntryPoint;

/// How the archive finds the code to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySpec {
    Point(EntryPoint),
    /// Looked up in the installed packages' `console_scripts`.
    ConsoleScript(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Everything one build needs from the user.
///
/// Only obtainable through `BuildRequest::new`, which runs the gatekeeper.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    entry: Option<EntrySpec>,
    output: PathBuf,
    installer_args: VettedArgs,
    interpreter: Option<PathBuf>,
    site_packages: Vec<PathBuf>,
    compression: Compression,
}

impl BuildRequest {
    pub fn new(
        installer_args: &[String],
        output: Option<&Path>,
        blacklist: &Blacklist,
    ) -> Result<Self, UsageError> {
        let (installer_args, output) = gatekeep(installer_args, output, blacklist)?;
        Ok(Self {
            entry: None,
            output,
            installer_args,
            interpreter: None,
            site_packages: Vec::new(),
            compression: Compression::default(),
        })
    }

    pub fn with_entry(mut self, entry: Option<EntrySpec>) -> Self {
        self.entry = entry;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_site_packages(mut self, dirs: Vec<PathBuf>) -> Self {
        self.site_packages = dirs;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn entry(&self) -> Option<&EntrySpec> {
        self.entry.as_ref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn installer_args(&self) -> &[String] {
        self.installer_args.as_slice()
    }

    pub fn interpreter(&self) -> Option<&Path> {
        self.interpreter.as_deref()
    }

    pub fn site_packages(&self) -> &[PathBuf] {
        &self.site_packages
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}
