//! Command implementations

use std::path::PathBuf;

use anyhow::Result;

use libplan::ops::ResolveOptions;
use libplan::util::{Config, GlobalContext};

pub mod check;
pub mod classify;
pub mod libraries;
pub mod plan;

/// State shared by every command.
pub struct Globals {
    pub ctx: GlobalContext,
    pub root: Option<PathBuf>,
}

impl Globals {
    /// Merged config and the directory its relative paths are based on.
    pub fn project(&self) -> Result<(Config, PathBuf)> {
        let config = self.ctx.load_config()?;
        Ok((config, self.ctx.project_root()))
    }

    /// `--root` and the root environment variable are taken relative to the
    /// working directory.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            root: self.root.clone(),
            cwd: Some(self.ctx.cwd().to_path_buf()),
        }
    }
}
