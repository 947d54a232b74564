//! `libplan classify` command

use anyhow::Result;

use crate::cli::ClassifyArgs;
use crate::commands::Globals;
use libplan::ops::classify_reference;

pub fn execute(args: ClassifyArgs, globals: &Globals) -> Result<()> {
    let (config, project_root) = globals.project()?;

    let classification = classify_reference(
        &config,
        &project_root,
        &globals.resolve_options(),
        &args.reference,
        &args.library,
    )?;

    println!("{} (rule: {})", classification.owner, classification.rule);
    Ok(())
}
