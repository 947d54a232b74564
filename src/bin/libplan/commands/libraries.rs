//! `libplan libraries` command

use anyhow::Result;

use crate::cli::LibrariesArgs;
use crate::commands::Globals;
use libplan::ops::list_libraries;
use libplan::util::diagnostic::suggestions;

pub fn execute(args: LibrariesArgs, globals: &Globals) -> Result<()> {
    let (config, project_root) = globals.project()?;
    let libraries = list_libraries(&config, &project_root, &globals.resolve_options());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&libraries)?);
        return Ok(());
    }

    if libraries.is_empty() {
        println!("No libraries declared.");
        if globals.ctx.find_config().is_err() {
            println!("{}", suggestions::NO_CONFIG);
        }
        return Ok(());
    }

    let width = libraries
        .iter()
        .map(|lib| lib.name.len())
        .max()
        .unwrap_or(0);

    for lib in &libraries {
        let status = if lib.present { "ok" } else { "missing" };
        println!(
            "{:<width$}  {:<7}  {}",
            lib.name.as_str(),
            status,
            lib.manifest.display(),
            width = width
        );
    }

    Ok(())
}
