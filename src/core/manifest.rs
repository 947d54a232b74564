//! Compile-order manifests.
//!
//! A manifest is a line-oriented UTF-8 listing of the files a library
//! compiles, in the order they must be compiled. Blank lines and lines whose
//! first non-whitespace character is `#` are ignored; every other line is a
//! path expression, usually relative to the manifest's own directory:
//!
//! ```text
//! # uvvm_vvc_framework
//! ../src/ti_vvc_framework_support_pkg.vhd
//! ../../uvvm_util/src/types_pkg.vhd
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::layout::LibraryLayout;
use crate::util::fs;

/// Marks a comment line.
pub const COMMENT_PREFIX: char = '#';

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A raw file reference as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    raw: String,
}

impl PathExpr {
    pub fn new(raw: impl Into<String>) -> Self {
        PathExpr { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path segments, left to right, with `/` and `\` both treated as
    /// separators. Empty and `.` segments are skipped.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.raw
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
    }

    /// Whether any segment equals `name` exactly.
    pub fn has_segment(&self, name: &str) -> bool {
        self.segments().any(|segment| segment == name)
    }

    /// Whether the reference contains `marker` once separators are unified.
    pub fn contains(&self, marker: &str) -> bool {
        self.unified().contains(&marker.replace('\\', "/"))
    }

    /// Whether the reference begins with `prefix` once separators are unified.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.unified().starts_with(&prefix.replace('\\', "/"))
    }

    /// Absolute, normalized location of the referenced file when the
    /// reference is read relative to `base`.
    pub fn resolve_against(&self, base: &Path) -> PathBuf {
        fs::absolutize(base, Path::new(&self.unified()))
    }

    fn unified(&self) -> String {
        self.raw.replace('\\', "/")
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PathExpr {
    fn from(raw: &str) -> Self {
        PathExpr::new(raw)
    }
}

/// One line of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLine<'a> {
    Blank,
    Comment,
    Reference(&'a str),
}

impl<'a> ManifestLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ManifestLine::Blank
        } else if trimmed.starts_with(COMMENT_PREFIX) {
            ManifestLine::Comment
        } else {
            ManifestLine::Reference(trimmed)
        }
    }
}

/// A file reference together with the manifest line that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based physical line number, counting skipped lines
    pub line: usize,
    pub reference: PathExpr,
}

/// A manifest loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    path: PathBuf,
    contents: String,
}

impl Manifest {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Manifest {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Load the manifest at `path`. A missing file yields `Ok(None)`.
    pub fn load(path: &Path) -> io::Result<Option<Self>> {
        Ok(fs::read_optional(path)?.map(|contents| Manifest::new(path, contents)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative references are resolved against.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// File references in declaration order, produced lazily.
    ///
    /// A leading UTF-8 byte order mark is ignored.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry> + '_ {
        self.contents
            .strip_prefix(BYTE_ORDER_MARK)
            .unwrap_or(&self.contents)
            .lines()
            .enumerate()
            .filter_map(|(index, line)| match ManifestLine::parse(line) {
                ManifestLine::Reference(reference) => Some(ManifestEntry {
                    line: index + 1,
                    reference: PathExpr::new(reference),
                }),
                ManifestLine::Blank | ManifestLine::Comment => None,
            })
    }
}

/// Read the manifest of `library` from `layout`.
///
/// `Ok(None)` means the library has no manifest, which is not an error: a
/// declared library may simply be unused. Callers decide whether to log it.
pub fn read_manifest(layout: &LibraryLayout, library: &str) -> io::Result<Option<Manifest>> {
    Manifest::load(&layout.manifest_path(library))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lines() {
        assert_eq!(ManifestLine::parse("   \t"), ManifestLine::Blank);
        assert_eq!(ManifestLine::parse("  # util"), ManifestLine::Comment);
        assert_eq!(
            ManifestLine::parse("  ../src/a.vhd  "),
            ManifestLine::Reference("../src/a.vhd")
        );
    }

    #[test]
    fn test_entries_skip_blanks_and_comments() {
        let manifest = Manifest::new(
            "/opt/uvvm/uvvm_util/script/compile_order.txt",
            "# Compile order\n\n../src/types_pkg.vhd\n   # indented comment\n\
             ../src/adaptations_pkg.vhd\r\n\n../src/string_methods_pkg.vhd",
        );

        let entries: Vec<_> = manifest
            .entries()
            .map(|e| (e.line, e.reference.as_str().to_string()))
            .collect();

        assert_eq!(
            entries,
            [
                (3, "../src/types_pkg.vhd".to_string()),
                (5, "../src/adaptations_pkg.vhd".to_string()),
                (7, "../src/string_methods_pkg.vhd".to_string()),
            ]
        );
    }

    #[test]
    fn test_only_comments_is_empty() {
        let manifest = Manifest::new("compile_order.txt", "# nothing yet\n\n   \n");
        assert_eq!(manifest.entries().count(), 0);
    }

    #[test]
    fn test_entries_ignore_byte_order_mark() {
        let manifest = Manifest::new(
            "/opt/uvvm/uvvm_util/script/compile_order.txt",
            "\u{feff}# header\n../src/types_pkg.vhd\n",
        );
        let entries: Vec<_> = manifest.entries().collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 2);
        assert_eq!(entries[0].reference.as_str(), "../src/types_pkg.vhd");
    }

    #[test]
    fn test_path_expr_segments() {
        let expr = PathExpr::new("..\\../bitvis_vip_uart/./src//uart_bfm_pkg.vhd");
        let segments: Vec<_> = expr.segments().collect();
        assert_eq!(
            segments,
            ["..", "..", "bitvis_vip_uart", "src", "uart_bfm_pkg.vhd"]
        );
        assert_eq!(expr.segments().next_back(), Some("uart_bfm_pkg.vhd"));
        assert!(expr.has_segment("bitvis_vip_uart"));
        assert!(!expr.has_segment("bitvis_vip"));
    }

    #[test]
    fn test_path_expr_markers() {
        let expr = PathExpr::new("..\\src\\foo.vhd");
        assert!(expr.contains("../src"));
        assert!(expr.starts_with("../"));
    }

    #[test]
    fn test_resolve_against_manifest_dir() {
        let manifest = Manifest::new("/opt/uvvm/uvvm_vvc_framework/script/compile_order.txt", "");
        let expr = PathExpr::new("../../uvvm_util/src/types_pkg.vhd");

        assert_eq!(
            expr.resolve_against(manifest.dir()),
            PathBuf::from("/opt/uvvm/uvvm_util/src/types_pkg.vhd")
        );
    }

    #[test]
    fn test_read_manifest_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let layout = LibraryLayout::new(tmp.path());

        let manifest = read_manifest(&layout, "bitvis_irqc").unwrap();
        assert!(manifest.is_none());
    }

    #[test]
    fn test_read_manifest_present() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("uvvm_util").join("script");
        std::fs::create_dir_all(&script).unwrap();
        std::fs::write(script.join("compile_order.txt"), "../src/types_pkg.vhd\n").unwrap();

        let layout = LibraryLayout::new(tmp.path());
        let manifest = read_manifest(&layout, "uvvm_util")
            .unwrap()
            .unwrap();

        assert_eq!(manifest.dir(), script);
        assert_eq!(manifest.entries().count(), 1);
    }
}
