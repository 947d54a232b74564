//! libplan - library resolution and compile plans for VHDL collections
//!
//! This crate reads the `compile_order.txt` manifests of a UVVM-style library
//! collection, decides which library owns each listed file and produces an
//! ordered, deduplicated compile plan for simulators and language servers.

pub mod core;
pub mod ops;
pub mod plan;
pub mod resolver;
pub mod util;

/// Test utilities for libplan unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an on-disk library collection fixture.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Classifier, LibraryLayout, LibraryName, Manifest, PathExpr};
pub use plan::{CompilePlan, Library};
pub use resolver::{ResolveError, Resolver};
pub use util::context::GlobalContext;
