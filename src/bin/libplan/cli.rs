//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use libplan::plan::EmitFormat;

/// libplan - compile plans for VHDL library collections
#[derive(Parser)]
#[command(name = "libplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this project config instead of searching for libplan.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Collection root (overrides the environment and config)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the collection and print the compile plan
    Plan(PlanArgs),

    /// List declared libraries and their manifests
    Libraries(LibrariesArgs),

    /// Resolve the collection and report problems
    Check(CheckArgs),

    /// Show which library owns a manifest reference
    Classify(ClassifyArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Output format: text, json or vhdl-ls
    #[arg(long, default_value = "text")]
    pub format: EmitFormat,

    /// Write the plan to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only emit these libraries
    #[arg(long, value_name = "LIB")]
    pub only: Vec<String>,

    /// Show which manifest line contributed each file
    #[arg(long)]
    pub explain: bool,

    /// Print paths relative to the project root
    #[arg(long)]
    pub relative: bool,
}

#[derive(Args)]
pub struct LibrariesArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Fail when planned files are missing on disk
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Path expression as written in a compile_order.txt
    pub reference: String,

    /// Library whose manifest lists the reference
    #[arg(short, long, value_name = "LIB")]
    pub library: String,
}
