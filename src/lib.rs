//! zipstrap library exports.
//!
//! The binary is a thin clap front-end over these modules; integration
//! tests drive the pipeline through them directly.

pub mod build;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod logging;
pub mod native;
pub mod preflight;
pub mod process;
pub mod timing;

pub use build::{build_archive, BuildEnv, BuildOutcome, BuildRequest};
pub use error::{BuildError, InterpreterError, UsageError};
