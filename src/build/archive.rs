//! Zipapp assembly: interpreter line followed by a zip body.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{BuildError, IoContext};
use crate::preflight::Shebang;

use super::descriptor::{Descriptor, DESCRIPTOR_NAME};
use super::request::Compression;

impl From<Compression> for CompressionMethod {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

/// Write the interpreter line to `out`, then zip every file under `root`
/// after it.
///
/// Entries are streamed one file at a time, sorted, and carry a fixed
/// timestamp so the same tree always produces the same bytes.
pub fn assemble<W: Write + Seek>(
    root: &Path,
    shebang: &Shebang,
    compression: Compression,
    mut out: W,
) -> Result<W, BuildError> {
    out.write_all(shebang.line().as_bytes())
        .io_context(|| "failed to write interpreter line")?;

    let mut zip = ZipWriter::new(out);
    let method: CompressionMethod = compression.into();
    let options = |mode: u32| {
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
            .unix_permissions(mode)
    };

    let mut count = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .map_err(|e| BuildError::io(format!("failed to read {}", root.display()), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let metadata = entry
            .metadata()
            .map_err(|e| BuildError::io(format!("failed to stat {}", entry.path().display()), e.into()))?;
        let mode = if metadata.permissions().mode() & 0o111 != 0 {
            0o755
        } else {
            0o644
        };

        zip.start_file(name.as_str(), options(mode))?;
        let mut file = File::open(entry.path())
            .io_context(|| format!("failed to open {}", entry.path().display()))?;
        io::copy(&mut file, &mut zip)
            .io_context(|| format!("failed to archive {}", entry.path().display()))?;
        count += 1;
    }

    let out = zip.finish()?;
    tracing::debug!("Archived {} files", count);
    Ok(out)
}

/// What `zipstrap info` reports about a built archive.
#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    pub shebang: Option<String>,
    pub descriptor: Descriptor,
    pub entries: usize,
}

/// Read the interpreter line and descriptor of an existing archive.
pub fn read_info(path: &Path) -> Result<ArchiveInfo, BuildError> {
    let file = File::open(path).io_context(|| format!("failed to open {}", path.display()))?;

    let mut first = String::new();
    BufReader::new(&file)
        .take(4096)
        .read_line(&mut first)
        .io_context(|| format!("failed to read {}", path.display()))?;
    let shebang = first
        .strip_prefix("#!")
        .map(|s| s.trim_end_matches(['\r', '\n']).to_string());

    let file = File::open(path).io_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)?;
    let mut data = Vec::new();
    archive
        .by_name(DESCRIPTOR_NAME)?
        .read_to_end(&mut data)
        .io_context(|| format!("failed to read {} from {}", DESCRIPTOR_NAME, path.display()))?;

    Ok(ArchiveInfo {
        path: path.to_path_buf(),
        shebang,
        descriptor: Descriptor::from_json(&data)?,
        entries: archive.len(),
    })
}

/// Size of the file at `path`, for reporting.
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
