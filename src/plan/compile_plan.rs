//! The compile plan: libraries in creation order, files in compile order.
//!
//! Downstream tooling registers libraries with the compiler in
//! [`CompilePlan::library_order`] and adds each library's files in the order
//! given. Both orders are insertion orders; nothing in the plan depends on
//! hash iteration.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::LibraryName;

/// Where a file entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    /// Library whose manifest (or local source globs) listed the file
    pub declared_by: LibraryName,
    /// Manifest line, absent for glob-discovered files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Origin {
    pub fn manifest(declared_by: LibraryName, line: usize) -> Self {
        Origin {
            declared_by,
            line: Some(line),
        }
    }

    pub fn local(declared_by: LibraryName) -> Self {
        Origin {
            declared_by,
            line: None,
        }
    }
}

/// A file scheduled for compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub origin: Origin,
}

/// A library and its files in compile order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    name: LibraryName,
    files: Vec<SourceFile>,
    #[serde(skip)]
    seen: HashSet<PathBuf>,
}

impl Library {
    fn new(name: LibraryName) -> Self {
        Library {
            name,
            files: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn name(&self) -> &LibraryName {
        &self.name
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    fn push(&mut self, file: SourceFile) -> bool {
        if !self.seen.insert(file.path.clone()) {
            return false;
        }
        self.files.push(file);
        true
    }
}

/// A cross-library reference: `from`'s manifest lists files owned by `to`,
/// so `to` must be compiled before `from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub from: LibraryName,
    pub to: LibraryName,
}

/// Libraries in creation order with their deduplicated, ordered file lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompilePlan {
    libraries: Vec<Library>,
    references: Vec<Reference>,
    #[serde(skip)]
    index: HashMap<LibraryName, usize>,
}

impl CompilePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get `name`, creating it at the end of the library order on first use.
    pub fn ensure_library(&mut self, name: LibraryName) -> &mut Library {
        let index = match self.index.get(&name).copied() {
            Some(index) => index,
            None => {
                tracing::debug!("creating library `{}`", name);
                self.index.insert(name.clone(), self.libraries.len());
                self.libraries.push(Library::new(name));
                self.libraries.len() - 1
            }
        };
        &mut self.libraries[index]
    }

    /// Append `path` to `owner`, creating the library if needed.
    ///
    /// Returns `false` when the library already contains the path; the first
    /// occurrence keeps its position and origin.
    pub fn add_file(&mut self, owner: LibraryName, path: PathBuf, origin: Origin) -> bool {
        self.ensure_library(owner).push(SourceFile { path, origin })
    }

    /// Record that `from` depends on `to`. Self references and repeats are ignored.
    pub fn add_reference(&mut self, from: LibraryName, to: LibraryName) {
        if from == to {
            return;
        }
        let reference = Reference { from, to };
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
    }

    pub fn library(&self, name: &str) -> Option<&Library> {
        self.index.get(name).map(|&index| &self.libraries[index])
    }

    pub fn contains_library(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Libraries in creation order.
    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.iter()
    }

    /// Library names in creation order.
    pub fn library_order(&self) -> impl Iterator<Item = &LibraryName> {
        self.libraries.iter().map(|lib| &lib.name)
    }

    /// Files of `name` in compile order.
    pub fn files(&self, name: &str) -> Option<&[SourceFile]> {
        self.library(name).map(Library::files)
    }

    /// Cross-library references in the order they were first seen.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Libraries `name` depends on, in the order they were first referenced.
    pub fn dependencies_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LibraryName> {
        self.references
            .iter()
            .filter(move |r| r.from == name)
            .map(|r| &r.to)
    }

    /// Keep only the named libraries, preserving plan order.
    pub fn retain_libraries(&mut self, names: &[String]) {
        self.libraries
            .retain(|lib| names.iter().any(|n| n.as_str() == lib.name.as_str()));
        self.references.retain(|r| {
            names.iter().any(|n| n.as_str() == r.from.as_str())
                && names.iter().any(|n| n.as_str() == r.to.as_str())
        });
        self.index = self
            .libraries
            .iter()
            .enumerate()
            .map(|(i, lib)| (lib.name.clone(), i))
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Number of libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Number of files across all libraries.
    pub fn file_count(&self) -> usize {
        self.libraries.iter().map(Library::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> LibraryName {
        LibraryName::new(s)
    }

    #[test]
    fn test_creation_order_is_first_reference() {
        let mut plan = CompilePlan::new();
        let uart = name("bitvis_vip_uart");
        let util = name("uvvm_util");

        plan.add_file(util.clone(), "/u/types_pkg.vhd".into(), Origin::manifest(uart.clone(), 1));
        plan.add_file(uart.clone(), "/b/uart_bfm_pkg.vhd".into(), Origin::manifest(uart.clone(), 2));
        plan.add_file(util, "/u/string_methods_pkg.vhd".into(), Origin::manifest(uart, 3));

        let order: Vec<_> = plan.library_order().map(|n| n.as_str()).collect();
        assert_eq!(order, ["uvvm_util", "bitvis_vip_uart"]);
        assert_eq!(plan.file_count(), 3);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let mut plan = CompilePlan::new();
        let util = name("uvvm_util");
        let vvc = name("uvvm_vvc_framework");

        assert!(plan.add_file(util.clone(), "/u/a.vhd".into(), Origin::manifest(util.clone(), 1)));
        assert!(plan.add_file(util.clone(), "/u/b.vhd".into(), Origin::manifest(util.clone(), 2)));
        assert!(!plan.add_file(util.clone(), "/u/a.vhd".into(), Origin::manifest(vvc, 7)));

        let lib = plan.library("uvvm_util").unwrap();
        let paths: Vec<_> = lib.paths().collect();
        assert_eq!(paths, [Path::new("/u/a.vhd"), Path::new("/u/b.vhd")]);
        assert_eq!(lib.files()[0].origin, Origin::manifest(util, 1));
    }

    #[test]
    fn test_ensure_library_creates_empty() {
        let mut plan = CompilePlan::new();
        plan.ensure_library(name("osvvm"));

        assert!(plan.contains_library("osvvm"));
        assert!(plan.library("osvvm").unwrap().is_empty());
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_references() {
        let mut plan = CompilePlan::new();
        let uart = name("bitvis_vip_uart");
        let util = name("uvvm_util");
        let vvc = name("uvvm_vvc_framework");

        plan.add_reference(uart.clone(), util.clone());
        plan.add_reference(uart.clone(), vvc.clone());
        plan.add_reference(uart.clone(), util.clone());
        plan.add_reference(uart.clone(), uart);

        let deps: Vec<_> = plan.dependencies_of("bitvis_vip_uart").collect();
        assert_eq!(deps, [&util, &vvc]);
        assert_eq!(plan.references().len(), 2);
        assert_eq!(plan.dependencies_of("uvvm_util").count(), 0);
    }

    #[test]
    fn test_retain_libraries() {
        let mut plan = CompilePlan::new();
        let uart = name("bitvis_vip_uart");
        let util = name("uvvm_util");
        plan.add_file(util.clone(), "/u/a.vhd".into(), Origin::manifest(uart.clone(), 1));
        plan.add_file(uart.clone(), "/b/b.vhd".into(), Origin::manifest(uart.clone(), 2));
        plan.add_reference(uart, util);

        plan.retain_libraries(&["bitvis_vip_uart".to_string()]);

        assert_eq!(plan.len(), 1);
        assert!(plan.library("uvvm_util").is_none());
        assert_eq!(plan.files("bitvis_vip_uart").unwrap().len(), 1);
        assert!(plan.references().is_empty());
    }
}
