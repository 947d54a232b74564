//! Library resolution.
//!
//! Turns a declared library set and its compile-order manifests into a
//! [`CompilePlan`](crate::plan::CompilePlan). The resolver owns no global
//! state: each call builds and returns its own plan, or fails as a whole.

pub mod errors;
pub mod resolve;

pub use errors::ResolveError;
pub use resolve::Resolver;
