//! High-level operations.
//!
//! This module contains the implementation of libplan commands.

pub mod emit;
pub mod inspect;
pub mod resolve;

pub use emit::{emit_plan, EmitRequest};
pub use inspect::{check_project, classify_reference, list_libraries, CheckReport, LibraryStatus};
pub use resolve::{collection_layout, collection_root, declared_libraries, resolve_project, ResolveOptions};
