//! Core data structures for libplan.
//!
//! - Library names and the on-disk layout of a library collection
//! - Compile-order manifests and their path expressions
//! - The path classifier deciding which library owns a file

pub mod classify;
pub mod layout;
pub mod library;
pub mod manifest;

pub use classify::{Classification, ClassifyError, ClassifyRule, Classifier, Markers};
pub use layout::LibraryLayout;
pub use library::LibraryName;
pub use manifest::{read_manifest, Manifest, ManifestEntry, ManifestLine, PathExpr};
