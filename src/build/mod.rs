//! Archive builder.
//!
//! Orchestrates one build from a validated `BuildRequest`:
//! - `installer` - the package installer collaborator (pip)
//! - `console_script` - entry point lookup in installed metadata
//! - `descriptor` - `environment.json` and build identity
//! - `archive` - shebang + zip assembly
//! - `bootstrap.py` - runtime entry embedded as `__main__.py`

pub mod archive;
pub mod console_script;
pub mod descriptor;
pub mod entry_point;
pub mod installer;
pub mod request;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::common::{copy_tree, write_atomic, write_file_with_dirs, StagingDir};
use crate::error::{BuildError, IoContext};
use crate::native::{map_shared_objects, ExtensionPattern, SharedObjectMap};
use crate::preflight::{resolve_shebang, HostInterpreter, Shebang};
use crate::timing::Timer;

pub use archive::{read_info, ArchiveInfo};
pub use descriptor::Descriptor;
pub use entry_point::EntryPoint;
pub use installer::{Installer, PipInstaller};
pub use request::{BuildRequest, Compression, EntrySpec};

/// Runtime bootstrap stored as `__main__.py`.
pub const BOOTSTRAP: &str = include_str!("bootstrap.py");

/// Process-wide settings shared by every build, read-only.
#[derive(Debug, Clone)]
pub struct BuildEnv {
    pub host: HostInterpreter,
    pub extension_pattern: ExtensionPattern,
    /// Parent for staging directories; system temp dir when `None`.
    pub staging_parent: Option<PathBuf>,
}

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub output: PathBuf,
    pub shebang: Shebang,
    pub build_id: String,
    pub entry_point: Option<EntryPoint>,
    pub shared_objects: SharedObjectMap,
    pub size: u64,
}

/// Build the archive described by `request`.
///
/// Nothing touches the filesystem until the interpreter is validated. The
/// staging directory is removed on every path out of this function, and
/// the output path is only ever written by an atomic rename.
pub fn build_archive(
    request: &BuildRequest,
    env: &BuildEnv,
    installer: &dyn Installer,
) -> Result<BuildOutcome, BuildError> {
    let shebang = resolve_shebang(request.interpreter(), &env.host)?;
    tracing::info!("Interpreter: {}", shebang);

    let staging = StagingDir::create(env.staging_parent.as_deref())?;
    let site_packages = staging.site_packages();
    fs::create_dir_all(&site_packages)
        .io_context(|| format!("failed to create {}", site_packages.display()))?;

    let t = Timer::start("Install");
    for dir in request.site_packages() {
        let copied = copy_tree(dir, &site_packages)?;
        tracing::info!("Copied {} files from {}", copied, dir.display());
    }
    installer.install(&site_packages, request.installer_args())?;
    t.finish();

    let t = Timer::start("Bootstrap");
    let shared_objects = map_shared_objects(&site_packages, &env.extension_pattern)?;
    if !shared_objects.is_empty() {
        tracing::info!("Mapped {} compiled extensions", shared_objects.len());
    }

    let entry_point = match request.entry() {
        Some(EntrySpec::Point(ep)) => Some(ep.clone()),
        Some(EntrySpec::ConsoleScript(name)) => Some(console_script::resolve_console_script(
            &site_packages,
            name,
        )?),
        None => None,
    };
    let salt = entry_point.as_ref().map(|e| e.to_string()).unwrap_or_default();
    let build_id = descriptor::build_id(&site_packages, &salt)?;

    Descriptor::new(
        build_id.clone(),
        entry_point.as_ref().map(|e| e.to_string()),
        shebang.to_string(),
        shared_objects.clone(),
    )
    .write_to(staging.path())?;
    write_file_with_dirs(staging.path().join("__main__.py"), BOOTSTRAP)?;
    t.finish();

    let t = Timer::start("Archive");
    write_atomic(request.output(), 0o755, |file| {
        let mut writer = BufWriter::new(file);
        archive::assemble(staging.path(), &shebang, request.compression(), &mut writer)?;
        writer
            .flush()
            .io_context(|| format!("failed to write {}", request.output().display()))
    })?;
    t.finish();

    if let Err(e) = staging.cleanup() {
        tracing::warn!("{}", e);
    }

    Ok(BuildOutcome {
        output: request.output().to_path_buf(),
        shebang,
        build_id,
        entry_point,
        shared_objects,
        size: archive::file_size(request.output()),
    })
}

/// Build with pip as the installer.
pub fn build_with_pip(request: &BuildRequest, env: &BuildEnv) -> Result<BuildOutcome, BuildError> {
    let installer = PipInstaller::new(&env.host);
    build_archive(request, env, &installer)
}

