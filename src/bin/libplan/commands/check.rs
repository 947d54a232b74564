//! `libplan check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use crate::commands::Globals;
use libplan::ops::check_project;
use libplan::util::diagnostic::{emit, Diagnostic};

pub fn execute(args: CheckArgs, globals: &Globals) -> Result<()> {
    let (config, project_root) = globals.project()?;
    let report = check_project(&config, &project_root, &globals.resolve_options())?;

    for name in &report.missing_manifests {
        tracing::debug!("`{}` has no manifest", name);
    }

    if !report.missing_files.is_empty() {
        let mut diagnostic = Diagnostic::warning(format!(
            "{} planned file(s) do not exist",
            report.missing_files.len()
        ));
        if globals.ctx.is_verbose() {
            for path in &report.missing_files {
                diagnostic = diagnostic.with_context(path.display().to_string());
            }
        } else {
            diagnostic = diagnostic.with_suggestion("Run with --verbose to list them");
        }
        emit(&diagnostic, false);
    }

    println!(
        "{} libraries, {} files, {} cross-library references",
        report.libraries, report.files, report.references
    );
    if !report.missing_manifests.is_empty() {
        let names: Vec<&str> = report
            .missing_manifests
            .iter()
            .map(|name| name.as_str())
            .collect();
        println!("no manifest: {}", names.join(", "));
    }

    if args.strict && !report.is_clean() {
        bail!("{} planned file(s) are missing", report.missing_files.len());
    }

    Ok(())
}
