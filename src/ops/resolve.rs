//! Project resolution operations.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{LibraryLayout, LibraryName, Markers};
use crate::plan::{CompilePlan, Origin};
use crate::resolver::Resolver;
use crate::util::config::{Config, LocalLibraryConfig, DEFAULT_COLLECTION_ROOT};
use crate::util::fs::{absolutize, glob_files};

/// Options for resolving a project.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Collection root given on the command line; beats env and config
    pub root: Option<PathBuf>,

    /// Base for a relative `root` or environment value (the project root if unset)
    pub cwd: Option<PathBuf>,
}

/// Determine the collection root.
///
/// Order of precedence (highest to lowest):
/// 1. `--root`
/// 2. The environment variable named by `collection.root_env` (`UVVM_HOME`)
/// 3. `collection.root` from config
/// 4. `/opt/uvvm`
///
/// A relative `--root` or environment value is taken relative to
/// `opts.cwd`; a relative config value is taken relative to `project_root`.
pub fn collection_root(
    config: &Config,
    project_root: &Path,
    opts: &ResolveOptions,
    env: impl Fn(&str) -> Option<String>,
) -> PathBuf {
    let cwd = opts.cwd.as_deref().unwrap_or(project_root);

    let from_caller = opts.root.clone().or_else(|| {
        env(config.root_env())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    if let Some(root) = from_caller {
        return absolutize(cwd, &root);
    }

    let root = config
        .collection
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COLLECTION_ROOT));
    absolutize(project_root, &root)
}

/// Build the on-disk layout of the configured collection.
pub fn collection_layout(config: &Config, project_root: &Path, opts: &ResolveOptions) -> LibraryLayout {
    let root = collection_root(config, project_root, opts, |key| std::env::var(key).ok());

    config.collection.paths.iter().fold(
        LibraryLayout::new(root).with_manifest_subpath(config.manifest_subpath()),
        |layout, (library, path)| layout.with_library_root(library, absolutize(project_root, path)),
    )
}

/// Declared collection libraries, in order.
///
/// A disabled collection declares nothing, which resolves to an empty plan.
pub fn declared_libraries(config: &Config) -> Vec<LibraryName> {
    if !config.collection.enabled() {
        tracing::info!("Library collection disabled; nothing declared");
        return Vec::new();
    }
    config
        .collection
        .libraries
        .iter()
        .map(LibraryName::new)
        .collect()
}

/// Classification markers from config.
pub fn markers(config: &Config) -> Markers {
    Markers {
        target_dependent: config.classify.target_dependent_marker().to_string(),
        own_source: config.classify.own_source_marker().to_string(),
    }
}

/// Build the resolver described by `config`.
pub fn resolver(config: &Config, project_root: &Path, opts: &ResolveOptions) -> Resolver {
    Resolver::new(collection_layout(config, project_root, opts))
        .with_markers(markers(config))
        .with_file_check(config.collection.check_files())
}

/// Resolve the whole project: the library collection first, then the
/// project-local glob libraries appended after it.
pub fn resolve_project(
    config: &Config,
    project_root: &Path,
    opts: &ResolveOptions,
) -> Result<CompilePlan> {
    let resolver = resolver(config, project_root, opts);
    tracing::debug!("collection root: {}", resolver.layout().root().display());

    let mut plan = resolver.resolve(&declared_libraries(config))?;

    for local in &config.local {
        add_local_library(&mut plan, local, project_root)?;
    }

    Ok(plan)
}

/// Add a glob-sourced library to `plan`.
///
/// Files are added in sorted path order through the same deduplication as
/// manifest entries. A library whose globs match nothing is still created.
pub fn add_local_library(
    plan: &mut CompilePlan,
    local: &LocalLibraryConfig,
    project_root: &Path,
) -> Result<()> {
    let name = LibraryName::new(&local.name);
    let files = glob_files(project_root, &local.sources)?;

    if files.is_empty() {
        tracing::warn!(
            "No HDL files found for library `{}` (patterns: {})",
            name,
            local.sources.join(", ")
        );
    }

    plan.ensure_library(name.clone());
    for path in files {
        plan.add_file(name.clone(), path, Origin::local(name.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CollectionFixture;
    use crate::util::config::CollectionConfig;

    fn config_for(fx: &CollectionFixture, libraries: &[&str]) -> Config {
        Config {
            collection: CollectionConfig {
                root: Some(fx.root().to_path_buf()),
                root_env: Some("LIBPLAN_TEST_UNSET_ROOT".to_string()),
                libraries: libraries.iter().map(|s| s.to_string()).collect(),
                ..CollectionConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_collection_root_precedence() {
        let mut config = Config::default();
        let project = Path::new("/work/proj");
        let no_env = |_: &str| None;

        assert_eq!(
            collection_root(&config, project, &ResolveOptions::default(), no_env),
            PathBuf::from("/opt/uvvm")
        );

        config.collection.root = Some(PathBuf::from("vendor/uvvm"));
        assert_eq!(
            collection_root(&config, project, &ResolveOptions::default(), no_env),
            PathBuf::from("/work/proj/vendor/uvvm")
        );

        let env = |key: &str| (key == "UVVM_HOME").then(|| "/tools/uvvm".to_string());
        assert_eq!(
            collection_root(&config, project, &ResolveOptions::default(), env),
            PathBuf::from("/tools/uvvm")
        );

        let opts = ResolveOptions {
            root: Some(PathBuf::from("../uvvm")),
            cwd: None,
        };
        assert_eq!(
            collection_root(&config, project, &opts, env),
            PathBuf::from("/work/uvvm")
        );
    }

    #[test]
    fn test_relative_env_root_follows_working_directory() {
        let mut config = Config::default();
        config.collection.root = Some(PathBuf::from("vendor/uvvm"));
        let project = Path::new("/work/proj");
        let opts = ResolveOptions {
            root: None,
            cwd: Some(PathBuf::from("/work/proj/sim")),
        };

        let env = |key: &str| (key == "UVVM_HOME").then(|| "../uvvm".to_string());
        assert_eq!(
            collection_root(&config, project, &opts, env),
            PathBuf::from("/work/proj/uvvm")
        );

        let no_env = |_: &str| None;
        assert_eq!(
            collection_root(&config, project, &opts, no_env),
            PathBuf::from("/work/proj/vendor/uvvm")
        );

        let opts = ResolveOptions {
            root: Some(PathBuf::from("local_uvvm")),
            ..opts
        };
        assert_eq!(
            collection_root(&config, project, &opts, env),
            PathBuf::from("/work/proj/sim/local_uvvm")
        );
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let config = Config::default();
        let env = |_: &str| Some(String::new());
        assert_eq!(
            collection_root(&config, Path::new("/p"), &ResolveOptions::default(), env),
            PathBuf::from("/opt/uvvm")
        );
    }

    #[test]
    fn test_disabled_collection_declares_nothing() {
        let mut config = Config::default();
        config.collection.libraries = vec!["uvvm_util".to_string()];
        assert_eq!(declared_libraries(&config).len(), 1);

        config.collection.enabled = Some(false);
        assert!(declared_libraries(&config).is_empty());
    }

    #[test]
    fn test_resolve_project_with_local_library() {
        let fx = CollectionFixture::new();
        fx.manifest("uvvm_util", &["../src/types_pkg.vhd"]);
        fx.source("project/hdl/uart/uart_tx.vhd");
        fx.source("project/hdl/uart/tb_uart_tx.vhd");
        fx.source("project/hdl/fifo.vhd");

        let mut config = config_for(&fx, &["uvvm_util"]);
        config.local.push(LocalLibraryConfig {
            name: "main".to_string(),
            sources: vec!["hdl/**/*.vhd".to_string()],
        });

        let project = fx.root().join("project");
        let plan = resolve_project(&config, &project, &ResolveOptions::default()).unwrap();

        let order: Vec<_> = plan.library_order().map(|n| n.as_str()).collect();
        assert_eq!(order, ["uvvm_util", "main"]);

        let main = plan.library("main").unwrap();
        let names: Vec<_> = main
            .paths()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["fifo.vhd", "tb_uart_tx.vhd", "uart_tx.vhd"]);
        assert_eq!(main.files()[0].origin.line, None);
    }

    #[test]
    fn test_local_library_without_matches_is_created_empty() {
        let fx = CollectionFixture::new();
        let mut config = config_for(&fx, &[]);
        config.local.push(LocalLibraryConfig {
            name: "main".to_string(),
            sources: vec!["hdl/**/*.vhd".to_string()],
        });

        let plan = resolve_project(&config, fx.root(), &ResolveOptions::default()).unwrap();
        assert!(plan.library("main").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_project_uses_config_markers_and_paths() {
        let fx = CollectionFixture::new();
        let external = fx.root().join("external").join("bitvis_uart");
        std::fs::create_dir_all(external.join("script")).unwrap();
        std::fs::write(
            external.join("script").join("compile_order.txt"),
            "hw/uvvm_util/uart_target_pkg.vhd\n",
        )
        .unwrap();

        let mut config = config_for(&fx, &["uvvm_util", "bitvis_uart"]);
        config
            .collection
            .paths
            .insert("bitvis_uart".to_string(), external.clone());
        config.classify.target_dependent_marker = Some("hw".to_string());

        let plan = resolve_project(&config, fx.root(), &ResolveOptions::default()).unwrap();

        assert_eq!(
            plan.files("bitvis_uart").unwrap()[0].path,
            external.join("script/hw/uvvm_util/uart_target_pkg.vhd")
        );
        assert!(!plan.contains_library("uvvm_util"));
    }

    #[test]
    fn test_resolve_project_propagates_ownership_failure() {
        let fx = CollectionFixture::new();
        fx.manifest("uvvm_util", &["/elsewhere/unknown.vhd"]);

        let config = config_for(&fx, &["uvvm_util"]);
        let err = resolve_project(&config, fx.root(), &ResolveOptions::default()).unwrap_err();

        assert!(err
            .downcast_ref::<crate::resolver::ResolveError>()
            .is_some());
    }
}
