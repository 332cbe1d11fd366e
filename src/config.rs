//! Configuration management for zipstrap.
//!
//! Reads configuration from the environment. `main` loads a `.env` file
//! first, so environment variables take precedence over it.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::build::BuildEnv;
use crate::native::{ExtensionPattern, DEFAULT_EXTENSION_PATTERN};
use crate::preflight::HostInterpreter;

/// Interpreter used when `ZIPSTRAP_PYTHON` is unset.
pub const DEFAULT_PYTHON: &str = "python3";

/// zipstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host interpreter name or path (runs pip, names the auto shebang)
    pub python: String,
    /// Regex recognising compiled extension file names
    pub extension_pattern: String,
    /// Parent directory for staging trees (default: system temp dir)
    pub staging_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let python = non_empty("ZIPSTRAP_PYTHON")
            .unwrap_or(DEFAULT_PYTHON)
            .to_string();

        let extension_pattern = non_empty("ZIPSTRAP_EXTENSION_PATTERN")
            .unwrap_or(DEFAULT_EXTENSION_PATTERN)
            .to_string();

        let staging_dir = non_empty("ZIPSTRAP_TMPDIR").map(PathBuf::from);

        Self {
            python,
            extension_pattern,
            staging_dir,
        }
    }

    /// Resolve the host interpreter and compile patterns for building.
    pub fn build_env(&self) -> Result<BuildEnv> {
        let host = HostInterpreter::discover(&self.python)?;
        let extension_pattern = ExtensionPattern::new(&self.extension_pattern)
            .context("invalid ZIPSTRAP_EXTENSION_PATTERN")?;
        Ok(BuildEnv {
            host,
            extension_pattern,
            staging_parent: self.staging_dir.clone(),
        })
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  ZIPSTRAP_PYTHON: {}", self.python);
        println!("  ZIPSTRAP_EXTENSION_PATTERN: {}", self.extension_pattern);
        match &self.staging_dir {
            Some(dir) => println!("  ZIPSTRAP_TMPDIR: {}", dir.display()),
            None => println!("  ZIPSTRAP_TMPDIR: (system default)"),
        }
        match HostInterpreter::discover(&self.python) {
            Ok(host) => println!("  Host interpreter: {}", host.path().display()),
            Err(e) => println!("  Host interpreter: NOT FOUND ({})", e),
        }
    }
}
