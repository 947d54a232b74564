//! Writing a resolved plan out.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::plan::{render, CompilePlan, EmitOptions};
use crate::util::fs::write_string;

/// Where and what to emit.
#[derive(Debug, Clone, Default)]
pub struct EmitRequest {
    pub options: EmitOptions,

    /// Restrict output to these libraries (in plan order)
    pub only: Vec<String>,

    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

/// Render `plan` per `request` and write it out.
///
/// Naming a library in `only` that the plan does not contain is an error.
pub fn emit_plan(mut plan: CompilePlan, request: &EmitRequest) -> Result<()> {
    if !request.only.is_empty() {
        for name in &request.only {
            if !plan.contains_library(name) {
                bail!(
                    "library `{}` is not part of the plan\n\
                     help: run `libplan libraries` to see what is declared",
                    name
                );
            }
        }
        plan.retain_libraries(&request.only);
    }

    let rendered = render(&plan, &request.options)?;

    match &request.output {
        Some(path) => {
            write_string(path, &rendered)?;
            tracing::info!("Wrote {} libraries to {}", plan.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("failed to write plan to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
