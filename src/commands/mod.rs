//! CLI command handlers.
//!
//! - `build` - Build a zipapp
//! - `info` - Describe a built zipapp

pub mod build;
pub mod info;

pub use build::{cmd_build, BuildArgs};
pub use info::cmd_info;

use crate::error::{BuildError, UsageError};

/// Exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<BuildError>()
        .map(BuildError::exit_code)
        .unwrap_or(1)
}

/// Text printed for a failed command.
///
/// Usage errors are shown verbatim; everything else gets the full chain.
pub fn error_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<UsageError>() {
        return e.to_string();
    }
    if let Some(BuildError::Usage(e)) = err.downcast_ref::<BuildError>() {
        return e.to_string();
    }
    format!("error: {:#}", err)
}
