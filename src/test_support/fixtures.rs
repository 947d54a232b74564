//! Test fixtures for common test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::layout::DEFAULT_MANIFEST_SUBPATH;
use crate::core::LibraryLayout;
use crate::resolver::Resolver;

/// A library collection in a temporary directory, laid out like UVVM:
/// `<root>/<library>/script/compile_order.txt`.
#[derive(Debug)]
pub struct CollectionFixture {
    dir: TempDir,
}

impl CollectionFixture {
    pub fn new() -> Self {
        CollectionFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self, library: &str) -> PathBuf {
        self.root().join(library).join(DEFAULT_MANIFEST_SUBPATH)
    }

    /// Write the manifest of `library`, one entry per line.
    pub fn manifest(&self, library: &str, lines: &[&str]) -> &Self {
        let path = self.manifest_path(library);
        fs::create_dir_all(path.parent().unwrap()).expect("failed to create script dir");
        fs::write(&path, lines.join("\n") + "\n").expect("failed to write manifest");
        self
    }

    /// Create an empty source file at `relative` under the root.
    pub fn source(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("failed to create source dir");
        fs::write(&path, "-- generated by test fixture\n").expect("failed to write source");
        path
    }

    pub fn layout(&self) -> LibraryLayout {
        LibraryLayout::new(self.root())
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.layout())
    }
}

impl Default for CollectionFixture {
    fn default() -> Self {
        Self::new()
    }
}
