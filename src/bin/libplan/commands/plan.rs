//! `libplan plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use crate::commands::Globals;
use libplan::ops::{emit_plan, resolve_project, EmitRequest};
use libplan::plan::EmitOptions;

pub fn execute(args: PlanArgs, globals: &Globals) -> Result<()> {
    let (config, project_root) = globals.project()?;

    let plan = resolve_project(&config, &project_root, &globals.resolve_options())?;

    let request = EmitRequest {
        options: EmitOptions {
            format: args.format,
            explain: args.explain,
            relative_to: args.relative.then(|| project_root.clone()),
            standard: config.emit.standard().to_string(),
        },
        only: args.only,
        output: args.output.map(|path| globals.ctx.cwd().join(path)),
    };

    emit_plan(plan, &request)
}
