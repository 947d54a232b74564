//! libplan CLI - compile plans for VHDL library collections

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libplan::resolver::ResolveError;
use libplan::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => eprintln!("{:?}", err.to_report()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("libplan=debug")
    } else {
        EnvFilter::new("libplan=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?.with_config(cli.config);
    ctx.set_verbose(cli.verbose);
    let globals = commands::Globals {
        ctx,
        root: cli.root,
    };

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, &globals),
        Commands::Libraries(args) => commands::libraries::execute(args, &globals),
        Commands::Check(args) => commands::check::execute(args, &globals),
        Commands::Classify(args) => commands::classify::execute(args, &globals),
    }
}
