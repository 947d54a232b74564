//! Rendering a compile plan for downstream tools.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use toml_edit::{value, Array, DocumentMut, Item, Table};

use crate::plan::CompilePlan;
use crate::util::fs::relative_path;

/// Output format of an emitted plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Machine-readable JSON document
    Json,
    /// `vhdl_ls.toml` project file for the VHDL language server
    VhdlLs,
}

impl FromStr for EmitFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(EmitFormat::Text),
            "json" => Ok(EmitFormat::Json),
            "vhdl-ls" | "vhdl_ls" => Ok(EmitFormat::VhdlLs),
            _ => Err(format!(
                "invalid format '{}'; expected 'text', 'json', or 'vhdl-ls'",
                s
            )),
        }
    }
}

/// Options controlling how a plan is rendered.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub format: EmitFormat,

    /// Show which manifest line contributed each file (text only)
    pub explain: bool,

    /// Print paths relative to this directory instead of absolute
    pub relative_to: Option<PathBuf>,

    /// VHDL standard written to `vhdl_ls.toml`
    pub standard: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            format: EmitFormat::Text,
            explain: false,
            relative_to: None,
            standard: "2008".to_string(),
        }
    }
}

impl EmitOptions {
    fn display_path(&self, path: &Path) -> String {
        match &self.relative_to {
            Some(base) => relative_path(base, path).display().to_string(),
            None => path.display().to_string(),
        }
    }
}

/// Render `plan` in the requested format.
///
/// An empty plan renders to an empty (but well-formed) document.
pub fn render(plan: &CompilePlan, opts: &EmitOptions) -> Result<String> {
    match opts.format {
        EmitFormat::Text => Ok(render_text(plan, opts)),
        EmitFormat::Json => render_json(plan),
        EmitFormat::VhdlLs => Ok(render_vhdl_ls(plan, opts)),
    }
}

fn render_text(plan: &CompilePlan, opts: &EmitOptions) -> String {
    let mut out = String::new();

    for library in plan.libraries() {
        let noun = if library.len() == 1 { "file" } else { "files" };
        let _ = write!(out, "{} ({} {})", library.name(), library.len(), noun);

        let deps: Vec<_> = plan
            .dependencies_of(library.name().as_str())
            .map(|d| d.as_str())
            .collect();
        if opts.explain && !deps.is_empty() {
            let _ = write!(out, " -> depends on {}", deps.join(", "));
        }
        out.push('\n');

        for file in library.files() {
            let _ = write!(out, "    {}", opts.display_path(&file.path));
            if opts.explain {
                match file.origin.line {
                    Some(line) => {
                        let _ = write!(out, "  [{}:{}]", file.origin.declared_by, line);
                    }
                    None => {
                        let _ = write!(out, "  [{} sources]", file.origin.declared_by);
                    }
                }
            }
            out.push('\n');
        }
    }

    out
}

fn render_json(plan: &CompilePlan) -> Result<String> {
    let mut json = serde_json::to_string_pretty(plan).context("failed to serialize compile plan")?;
    json.push('\n');
    Ok(json)
}

/// `vhdl_ls.toml`: `[libraries]` with one `<name>.files` array per library,
/// in plan order.
fn render_vhdl_ls(plan: &CompilePlan, opts: &EmitOptions) -> String {
    let mut doc = DocumentMut::new();
    doc["standard"] = value(opts.standard.as_str());

    let mut libraries = Table::new();
    for library in plan.libraries() {
        let mut files = Array::new();
        for path in library.paths() {
            files.push(opts.display_path(path));
        }

        let mut entry = Table::new();
        entry.set_dotted(true);
        entry.insert("files", value(files));
        libraries.insert(library.name().as_str(), Item::Table(entry));
    }
    doc["libraries"] = Item::Table(libraries);

    let mut lint = Table::new();
    lint.insert("unused", value("error"));
    lint.insert("unnecessary_work_library", value(false));
    doc["lint"] = Item::Table(lint);

    doc.to_string()
}
