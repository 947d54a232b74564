//! The resolution pass.
//!
//! Reads every declared library's manifest in declaration order, attributes
//! each referenced file to its owning library and folds the result into a
//! [`CompilePlan`]. The pass is pure apart from reading manifests: the same
//! manifests and declaration order always produce the same plan.

use std::collections::HashSet;

use crate::core::{read_manifest, Classifier, LibraryLayout, LibraryName, Manifest, Markers};
use crate::plan::{CompilePlan, Origin};
use crate::resolver::ResolveError;

/// Resolves a library collection into a compile plan.
#[derive(Debug, Clone)]
pub struct Resolver {
    layout: LibraryLayout,
    markers: Markers,
    check_files: bool,
}

impl Resolver {
    pub fn new(layout: LibraryLayout) -> Self {
        Resolver {
            layout,
            markers: Markers::default(),
            check_files: false,
        }
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Warn about resolved files that do not exist on disk.
    pub fn with_file_check(mut self, check_files: bool) -> Self {
        self.check_files = check_files;
        self
    }

    pub fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    /// Classifier over `libraries` using this resolver's markers.
    pub fn classifier(&self, libraries: &[LibraryName]) -> Classifier {
        Classifier::new(libraries.iter().cloned()).with_markers(self.markers.clone())
    }

    /// Resolve `libraries` (in declaration order) into a compile plan.
    ///
    /// The declared names are also the set of libraries a file may be
    /// attributed to. A library without a manifest contributes nothing and is
    /// only created if another library's manifest references its files.
    pub fn resolve(&self, libraries: &[LibraryName]) -> Result<CompilePlan, ResolveError> {
        let mut seen = HashSet::new();
        let declared: Vec<LibraryName> = libraries
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        let classifier = self.classifier(&declared);
        let mut plan = CompilePlan::new();

        for library in &declared {
            let manifest_path = self.layout.manifest_path(library);
            let manifest = read_manifest(&self.layout, library).map_err(|source| {
                ResolveError::ManifestUnreadable {
                    library: library.clone(),
                    manifest: manifest_path.clone(),
                    source,
                }
            })?;

            let Some(manifest) = manifest else {
                tracing::debug!(
                    "no manifest for `{}` at {}, skipping",
                    library,
                    manifest_path.display()
                );
                continue;
            };

            tracing::debug!("processing `{}`", library);
            self.resolve_manifest(&classifier, library, &manifest, &mut plan)?;
        }

        tracing::info!(
            "Resolved {} files into {} libraries",
            plan.file_count(),
            plan.len()
        );

        Ok(plan)
    }

    fn resolve_manifest(
        &self,
        classifier: &Classifier,
        library: &LibraryName,
        manifest: &Manifest,
        plan: &mut CompilePlan,
    ) -> Result<(), ResolveError> {
        for entry in manifest.entries() {
            let path = entry.reference.resolve_against(manifest.dir());

            let classification = classifier
                .classify(&entry.reference, library)
                .map_err(|e| ResolveError::UnresolvableOwnership {
                    library: library.clone(),
                    line: entry.line,
                    reference: e.reference,
                    manifest: manifest.path().to_path_buf(),
                })?;
            let owner = classification.owner;

            tracing::debug!(
                "{}:{} `{}` -> `{}` ({})",
                library,
                entry.line,
                entry.reference,
                owner,
                classification.rule
            );

            if self.check_files && !path.is_file() {
                tracing::warn!(
                    "`{}` (listed by `{}`, line {}) does not exist",
                    path.display(),
                    library,
                    entry.line
                );
            }

            plan.add_reference(library.clone(), owner.clone());
            plan.add_file(owner, path, Origin::manifest(library.clone(), entry.line));
        }

        Ok(())
    }
}
