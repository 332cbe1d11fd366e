//! Resolve `console_scripts` names from installed distribution metadata.

use std::fs;
use std::path::Path;

use crate::error::{BuildError, IoContext};

use super::entry_point::EntryPoint;

/// Find `name` in the `[console_scripts]` of any `*.dist-info` under `site_packages`.
///
/// Distributions are searched in name order; the first match wins.
pub fn resolve_console_script(site_packages: &Path, name: &str) -> Result<EntryPoint, BuildError> {
    let entries = fs::read_dir(site_packages)
        .io_context(|| format!("failed to read {}", site_packages.display()))?;

    let mut dist_infos: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().ends_with(".dist-info"))
        })
        .collect();
    dist_infos.sort();

    for dist_info in dist_infos {
        let path = dist_info.join("entry_points.txt");
        if !path.exists() {
            continue;
        }
        let content =
            fs::read_to_string(&path).io_context(|| format!("failed to read {}", path.display()))?;
        if let Some(value) = find_console_script(&content, name) {
            match value.parse::<EntryPoint>() {
                Ok(ep) => {
                    tracing::debug!("Console script {} -> {} ({})", name, ep, path.display());
                    return Ok(ep);
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
    }

    Err(BuildError::ConsoleScriptNotFound(name.to_string()))
}

/// Value of `name` in the `[console_scripts]` section, extras stripped.
fn find_console_script<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = section.trim() == "console_scripts";
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == name {
                // `module:func [extra1,extra2]`
                let value = value.split('[').next().unwrap_or(value);
                return Some(value.trim());
            }
        }
    }
    None
}
