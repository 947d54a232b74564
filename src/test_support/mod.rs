//! Test utilities for libplan unit tests.
//!
//! Provides an on-disk library collection fixture so resolver and operation
//! tests can write real manifests without repeating directory plumbing.
//!
//! # Example
//!
//! ```rust,ignore
//! use libplan::test_support::{names, CollectionFixture};
//!
//! let fx = CollectionFixture::new();
//! fx.manifest("uvvm_util", &["../src/types_pkg.vhd"]);
//! let plan = fx.resolver().resolve(&names(&["uvvm_util"])).unwrap();
//! ```

pub mod fixtures;

pub use fixtures::*;

use crate::core::LibraryName;

/// Intern a list of library names, keeping their order.
pub fn names(list: &[&str]) -> Vec<LibraryName> {
    list.iter().map(|n| LibraryName::new(n)).collect()
}
