//! Shared test utilities for zipstrap tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use zipstrap::build::{BuildEnv, Installer};
use zipstrap::native::ExtensionPattern;
use zipstrap::preflight::HostInterpreter;
use zipstrap::BuildError;

/// `hello.py` used by the end-to-end tests.
pub const HELLO_MODULE: &str = "def main():\n    print(\"hello world\")\n";

/// Scratch area with separate staging and output directories.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Parent for staging directories; must be empty after every build
    pub staging: PathBuf,
    /// Where archives are written
    pub out: PathBuf,
    /// Runtime extraction root for built archives
    pub runtime_root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();
        let staging = base.join("staging");
        let out = base.join("out");
        let runtime_root = base.join("runtime");
        for dir in [&staging, &out, &runtime_root] {
            fs::create_dir_all(dir).expect("Failed to create test dir");
        }
        Self {
            _temp_dir: temp_dir,
            staging,
            out,
            runtime_root,
        }
    }

    /// Build settings using `host` and this environment's staging dir.
    pub fn build_env(&self, host: HostInterpreter) -> BuildEnv {
        BuildEnv {
            host,
            extension_pattern: ExtensionPattern::default(),
            staging_parent: Some(self.staging.clone()),
        }
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.out.join(name)
    }

    /// Number of entries left in the staging parent.
    pub fn leftover_staging(&self) -> usize {
        fs::read_dir(&self.staging)
            .expect("Failed to read staging dir")
            .count()
    }
}

/// Installer double: records calls and writes a fixed set of files.
pub struct FakeInstaller {
    files: Vec<(String, Vec<u8>)>,
    fail_with: Option<i32>,
    pub calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeInstaller {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            fail_with: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, rel: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((rel.to_string(), content.as_ref().to_vec()));
        self
    }

    /// Write some files, then fail with `code`.
    pub fn failing(mut self, code: i32) -> Self {
        self.fail_with = Some(code);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// The `hello` distribution, as pip would lay it out.
    pub fn hello() -> Self {
        Self::new()
            .with_file("hello.py", HELLO_MODULE)
            .with_file(
                "hello-0.1.0.dist-info/entry_points.txt",
                "[console_scripts]\nhello = hello:main\n",
            )
            .with_file(
                "hello-0.1.0.dist-info/METADATA",
                "Metadata-Version: 2.1\nName: hello\nVersion: 0.1.0\n",
            )
    }
}

impl Installer for FakeInstaller {
    fn install(&self, target: &Path, args: &[String]) -> Result<(), BuildError> {
        self.calls
            .borrow_mut()
            .push((target.to_path_buf(), args.to_vec()));
        for (rel, content) in &self.files {
            let path = target.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        match self.fail_with {
            Some(code) => Err(BuildError::InstallFailed { code }),
            None => Ok(()),
        }
    }
}

/// Create an executable file (a stand-in interpreter).
pub fn create_mock_executable(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, "#!/bin/sh\nexit 0\n").expect("Failed to write executable");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");
}

/// Host python3, if this machine has one.
pub fn host_python() -> Option<HostInterpreter> {
    HostInterpreter::discover("python3").ok()
}

/// True if `python3 -m pip` works here.
pub fn pip_available() -> bool {
    Command::new("python3")
        .args(["-m", "pip", "--version"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn record_hash(content: &[u8]) -> String {
    format!("sha256={}", URL_SAFE_NO_PAD.encode(Sha256::digest(content)))
}

/// Write `hello-0.1.0-py3-none-any.whl` into `dir` and return its path.
///
/// Lets pip install the hello package offline with `--no-index`.
pub fn build_hello_wheel(dir: &Path) -> PathBuf {
    let dist_info = "hello-0.1.0.dist-info";
    let files: Vec<(String, String)> = vec![
        ("hello.py".to_string(), HELLO_MODULE.to_string()),
        (
            format!("{dist_info}/METADATA"),
            "Metadata-Version: 2.1\nName: hello\nVersion: 0.1.0\n".to_string(),
        ),
        (
            format!("{dist_info}/WHEEL"),
            "Wheel-Version: 1.0\nGenerator: zipstrap-tests\nRoot-Is-Purelib: true\nTag: py3-none-any\n"
                .to_string(),
        ),
        (
            format!("{dist_info}/entry_points.txt"),
            "[console_scripts]\nhello = hello:main\n".to_string(),
        ),
    ];

    let mut record = String::new();
    for (name, content) in &files {
        record.push_str(&format!(
            "{},{},{}\n",
            name,
            record_hash(content.as_bytes()),
            content.len()
        ));
    }
    record.push_str(&format!("{dist_info}/RECORD,,\n"));

    let mut entries = files;
    entries.push((format!("{dist_info}/RECORD"), record));

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in &entries {
        zip.start_file(name.as_str(), SimpleFileOptions::default())
            .unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    let bytes = zip.finish().unwrap().into_inner();

    let path = dir.join("hello-0.1.0-py3-none-any.whl");
    fs::write(&path, bytes).expect("Failed to write wheel");
    path
}

/// Run a built archive directly and return (exit code, stdout).
pub fn run_archive(archive: &Path, runtime_root: &Path) -> (i32, String) {
    let output = Command::new(archive)
        .env("ZIPSTRAP_ROOT", runtime_root)
        .output()
        .expect("Failed to execute archive");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
