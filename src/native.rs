//! Compiled extension discovery.
//!
//! Maps every importable native extension in a staged site-packages tree
//! to its path so the bootstrap can load it regardless of where the tree
//! ends up at run time.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::BuildError;

/// Dotted module name -> `/`-separated path relative to the staged root.
pub type SharedObjectMap = BTreeMap<String, String>;

/// Default pattern for extension file names.
///
/// Matches `_extern.cpython-36m-x86_64-linux-gnu.so`, `foo.abi3.so`,
/// `foo.so` and `.pyd` files. `name` is everything before the first dot.
pub const DEFAULT_EXTENSION_PATTERN: &str = r"^(?P<name>[^.]+)(?:\.[^/]*)?\.(?:so|pyd)$";

/// Recognises compiled extension file names and extracts the module name.
#[derive(Debug, Clone)]
pub struct ExtensionPattern {
    regex: Regex,
}

impl ExtensionPattern {
    /// Compile a pattern. It must define a `name` capture group.
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let regex = Regex::new(pattern)?;
        if !regex.capture_names().flatten().any(|n| n == "name") {
            anyhow::bail!("extension pattern '{}' has no `name` capture group", pattern);
        }
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Logical module name of `file_name`, if it is an extension.
    pub fn module_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.regex
            .captures(file_name)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str())
    }
}

impl Default for ExtensionPattern {
    fn default() -> Self {
        match Self::new(DEFAULT_EXTENSION_PATTERN) {
            Ok(p) => p,
            Err(e) => unreachable!("default extension pattern is invalid: {e}"),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Walk `root` and map each compiled extension to its dotted module name.
///
/// Files under directories that cannot be Python packages (`*.dist-info`,
/// `foo.libs`, ...) are skipped. Two files resolving to the same module
/// name are an error.
pub fn map_shared_objects(
    root: &Path,
    pattern: &ExtensionPattern,
) -> Result<SharedObjectMap, BuildError> {
    let mut map = SharedObjectMap::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || e.file_name().to_str().is_some_and(is_identifier)
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let context = format!("failed to scan {}", root.display());
            BuildError::io(context, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(name) = pattern.module_name(file_name) else {
            continue;
        };
        if !is_identifier(name) {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let mut parts: Vec<String> = rel
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let rel_path = parts
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(file_name))
            .collect::<Vec<_>>()
            .join("/");

        parts.push(name.to_string());
        let module = parts.join(".");

        if let Some(first) = map.get(&module) {
            return Err(BuildError::SharedObjectCollision {
                module,
                first: first.clone(),
                second: rel_path,
            });
        }
        tracing::debug!("Native extension {} -> {}", module, rel_path);
        map.insert(module, rel_path);
    }

    Ok(map)
}
