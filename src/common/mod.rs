//! Shared utilities across zipstrap modules.

pub mod files;
pub mod temp;

pub use files::{copy_tree, write_atomic, write_file_with_dirs};
pub use temp::{StagingDir, SITE_PACKAGES};
