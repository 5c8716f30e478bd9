//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Test fixture rooted at `tests/fixtures/<name>/`.
pub struct TestFixture {
    pub fixture_dir: PathBuf,
}

impl TestFixture {
    pub fn load(name: &str) -> Result<Self, String> {
        let fixture_dir = manifest_dir().join("tests/fixtures").join(name);
        if !fixture_dir.is_dir() {
            return Err(format!("fixture directory {} not found", fixture_dir.display()));
        }
        Ok(Self { fixture_dir })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.fixture_dir.join(file)
    }

    pub fn read(&self, file: &str) -> String {
        let path = self.path(file);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()))
    }

    pub fn page(&self) -> String {
        self.read("page.wiki")
    }
}

/// Run the `pbb` binary with an isolated config home.
#[allow(dead_code)]
pub fn run_pbb(config_home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pbb"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn pbb")
}

#[allow(dead_code)]
pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 fixture path")
}
