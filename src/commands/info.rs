//! Info command - shows what a built archive will run.

use std::path::Path;

use anyhow::{Context, Result};

use crate::build::read_info;

pub fn cmd_info(archive: &Path, json: bool) -> Result<()> {
    let info = read_info(archive)
        .with_context(|| format!("{} is not a zipstrap archive", archive.display()))?;

    if json {
        println!("{}", info.descriptor.to_json()?);
        return Ok(());
    }

    println!("Archive: {}", info.path.display());
    println!(
        "  Interpreter: {}",
        info.shebang.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Entry point: {}",
        info.descriptor
            .entry_point
            .as_deref()
            .unwrap_or("(interactive console)")
    );
    println!("  Build id: {}", info.descriptor.build_id);
    println!("  Entries: {}", info.entries);
    println!(
        "  Compiled extensions: {}",
        info.descriptor.shared_objects.len()
    );
    for (module, path) in &info.descriptor.shared_objects {
        println!("    {} -> {}", module, path);
    }

    Ok(())
}
