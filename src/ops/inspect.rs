//! Inspecting a configured collection without building a plan.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::{Classification, LibraryName, PathExpr};
use crate::ops::resolve::{
    collection_layout, declared_libraries, resolve_project, resolver, ResolveOptions,
};
use crate::util::config::Config;

/// A declared library and where its manifest is expected.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStatus {
    pub name: LibraryName,
    pub manifest: PathBuf,
    pub present: bool,
}

/// Every declared library, in declaration order, with its manifest status.
pub fn list_libraries(
    config: &Config,
    project_root: &Path,
    opts: &ResolveOptions,
) -> Vec<LibraryStatus> {
    let layout = collection_layout(config, project_root, opts);

    declared_libraries(config)
        .into_iter()
        .map(|name| {
            let manifest = layout.manifest_path(&name);
            LibraryStatus {
                present: manifest.is_file(),
                name,
                manifest,
            }
        })
        .collect()
}

/// Summary of a successful resolution.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub libraries: usize,
    pub files: usize,
    pub references: usize,

    /// Declared libraries without a manifest
    pub missing_manifests: Vec<LibraryName>,

    /// Planned files that do not exist on disk
    pub missing_files: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty()
    }
}

/// Resolve the project and report what the plan contains.
///
/// Resolution errors propagate. Missing manifests and missing files are
/// collected rather than failing.
pub fn check_project(
    config: &Config,
    project_root: &Path,
    opts: &ResolveOptions,
) -> Result<CheckReport> {
    let plan = resolve_project(config, project_root, opts)?;

    let missing_manifests = list_libraries(config, project_root, opts)
        .into_iter()
        .filter(|status| !status.present)
        .map(|status| status.name)
        .collect();

    let missing_files = plan
        .libraries()
        .flat_map(|lib| lib.paths())
        .filter(|path| !path.exists())
        .map(Path::to_path_buf)
        .collect();

    Ok(CheckReport {
        libraries: plan.len(),
        files: plan.file_count(),
        references: plan.references().len(),
        missing_manifests,
        missing_files,
    })
}

/// Classify a single manifest reference as if it were listed by `library`.
pub fn classify_reference(
    config: &Config,
    project_root: &Path,
    opts: &ResolveOptions,
    reference: &str,
    library: &str,
) -> Result<Classification> {
    let resolver = resolver(config, project_root, opts);
    let declared = declared_libraries(config);
    let classifier = resolver.classifier(&declared);

    let current = LibraryName::new(library);
    if !classifier.is_known(library) {
        tracing::warn!("`{}` is not a declared library", current);
    }

    Ok(classifier.classify(&PathExpr::new(reference), &current)?)
}
