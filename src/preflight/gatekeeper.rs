//! Static checks on the installer argument list.

use std::path::{Path, PathBuf};

use crate::error::UsageError;

use super::blacklist::Blacklist;

/// Installer arguments that passed every gatekeeper check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VettedArgs(Vec<String>);

impl VettedArgs {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Check the raw installer arguments and output path.
///
/// Order is fixed: empty arguments, then missing output, then the first
/// blacklisted token.
pub fn gatekeep(
    args: &[String],
    output: Option<&Path>,
    blacklist: &Blacklist,
) -> Result<(VettedArgs, PathBuf), UsageError> {
    if args.is_empty() {
        return Err(UsageError::NoInstallerArgs);
    }

    let output = output.ok_or(UsageError::NoOutputFile)?;

    if let Some((arg, rule)) = args
        .iter()
        .find_map(|arg| blacklist.lookup(arg).map(|(_, rule)| (arg, rule)))
    {
        return Err(UsageError::Disallowed {
            arg: arg.clone(),
            reason: rule.reason.clone(),
        });
    }

    Ok((VettedArgs(args.to_vec()), output.to_path_buf()))
}
