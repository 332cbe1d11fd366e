//! Build command - assembles a zipapp from installer arguments.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::build::{self, BuildRequest, Compression, EntryPoint, EntrySpec};
use crate::config::Config;
use crate::preflight::Blacklist;

/// Flags of `zipstrap build`, already parsed.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    /// Raw `-e` value; parsed only after the installer arguments pass.
    pub entry_point: Option<String>,
    pub console_script: Option<String>,
    pub output: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub site_packages: Vec<PathBuf>,
    pub uncompressed: bool,
    pub installer_args: Vec<String>,
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs, config: &Config, blacklist: &Blacklist) -> Result<()> {
    // Argument checks come first, whatever else was passed.
    let request = BuildRequest::new(&args.installer_args, args.output.as_deref(), blacklist)?;

    let entry = entry_spec(args.entry_point, args.console_script)?;
    let compression = if args.uncompressed {
        Compression::Stored
    } else {
        Compression::Deflated
    };

    let request = request
        .with_entry(entry)
        .with_interpreter(args.python)
        .with_site_packages(args.site_packages)
        .with_compression(compression);

    let env = config.build_env()?;
    let outcome = build::build_with_pip(&request, &env)?;

    let size_mb = outcome.size as f64 / 1024.0 / 1024.0;
    println!("Built {} ({:.2} MB)", outcome.output.display(), size_mb);
    println!("  Interpreter: {}", outcome.shebang);
    match &outcome.entry_point {
        Some(ep) => println!("  Entry point: {}", ep),
        None => println!("  Entry point: (interactive console)"),
    }
    println!("  Build id: {}", outcome.build_id);

    Ok(())
}

/// Combine `-e` and `-c` into what the archive should run.
fn entry_spec(
    entry_point: Option<String>,
    console_script: Option<String>,
) -> Result<Option<EntrySpec>> {
    match (entry_point, console_script) {
        (Some(_), Some(_)) => {
            bail!("--entry-point and --console-script cannot be used together")
        }
        (Some(ep), None) => Ok(Some(EntrySpec::Point(ep.parse::<EntryPoint>()?))),
        (None, Some(name)) => Ok(Some(EntrySpec::ConsoleScript(name))),
        (None, None) => Ok(None),
    }
}
