//! Compile plans and their emitters.

pub mod compile_plan;
pub mod emit;

pub use compile_plan::{CompilePlan, Library, Origin, Reference, SourceFile};
pub use emit::{render, EmitFormat, EmitOptions};
