//! Where library manifests live on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest location relative to a library directory (UVVM convention).
pub const DEFAULT_MANIFEST_SUBPATH: &str = "script/compile_order.txt";

/// Directory layout of a library collection.
///
/// Each library `L` lives at `<root>/L` unless overridden, and lists its
/// sources in `<library root>/<manifest subpath>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    root: PathBuf,
    manifest: PathBuf,
    overrides: BTreeMap<String, PathBuf>,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LibraryLayout {
            root: root.into(),
            manifest: PathBuf::from(DEFAULT_MANIFEST_SUBPATH),
            overrides: BTreeMap::new(),
        }
    }

    /// Use a different manifest location inside each library directory.
    pub fn with_manifest_subpath(mut self, subpath: impl Into<PathBuf>) -> Self {
        self.manifest = subpath.into();
        self
    }

    /// Place one library outside the collection root.
    pub fn with_library_root(mut self, library: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.overrides.insert(library.into(), root.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_subpath(&self) -> &Path {
        &self.manifest
    }

    /// Directory of `library`.
    pub fn library_root(&self, library: &str) -> PathBuf {
        match self.overrides.get(library) {
            Some(path) => path.clone(),
            None => self.root.join(library),
        }
    }

    /// Path of the compile-order manifest for `library`.
    pub fn manifest_path(&self, library: &str) -> PathBuf {
        self.library_root(library).join(&self.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_path() {
        let layout = LibraryLayout::new("/opt/uvvm");
        assert_eq!(
            layout.manifest_path("uvvm_util"),
            PathBuf::from("/opt/uvvm/uvvm_util/script/compile_order.txt")
        );
    }

    #[test]
    fn test_overrides_and_subpath() {
        let layout = LibraryLayout::new("/opt/uvvm")
            .with_manifest_subpath("compile_order.txt")
            .with_library_root("bitvis_uart", "/srv/ip/uart");

        assert_eq!(
            layout.manifest_path("bitvis_uart"),
            PathBuf::from("/srv/ip/uart/compile_order.txt")
        );
        assert_eq!(
            layout.library_root("uvvm_util"),
            PathBuf::from("/opt/uvvm/uvvm_util")
        );
    }
}
