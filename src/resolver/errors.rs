//! Resolution error types and diagnostics.

use std::io;
use std::path::PathBuf;

use miette::NamedSource;
use thiserror::Error;

use crate::core::LibraryName;
use crate::util::diagnostic::{line_span, suggestions, Diagnostic, UnresolvableOwnershipError};

/// Error during library resolution.
///
/// Any error aborts the whole pass; no partial plan is returned.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot determine the library owning `{reference}` ({library}, line {line})")]
    UnresolvableOwnership {
        library: LibraryName,
        line: usize,
        reference: String,
        manifest: PathBuf,
    },

    #[error("failed to read the manifest of `{library}`: {}", .manifest.display())]
    ManifestUnreadable {
        library: LibraryName,
        manifest: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnresolvableOwnership {
                library,
                line,
                reference,
                manifest,
            } => Diagnostic::error(format!(
                "cannot determine the library owning `{}`",
                reference
            ))
            .with_location(manifest, Some(*line))
            .with_context(format!("while reading the manifest of `{}`", library))
            .with_context(
                "no path segment names a declared library and no own-source marker matched",
            )
            .with_suggestion(suggestions::UNRESOLVABLE)
            .with_suggestion(suggestions::FIX_MANIFEST),

            ResolveError::ManifestUnreadable {
                library,
                manifest,
                source,
            } => Diagnostic::error(format!("failed to read the manifest of `{}`", library))
                .with_location(manifest, None)
                .with_context(source.to_string()),
        }
    }

    /// Rich report pointing at the offending manifest line.
    ///
    /// The manifest is re-read to show the source; if that fails the report
    /// still carries the library, line and reference.
    pub fn to_report(&self) -> miette::Report {
        match self {
            ResolveError::UnresolvableOwnership {
                library,
                line,
                reference,
                manifest,
            } => {
                let contents = std::fs::read_to_string(manifest).ok();
                let span = contents.as_deref().and_then(|c| line_span(c, *line));
                let src = contents
                    .map(|c| NamedSource::new(manifest.display().to_string(), c));

                miette::Report::new(UnresolvableOwnershipError {
                    reference: reference.clone(),
                    library: library.to_string(),
                    line: *line,
                    src,
                    span,
                })
            }
            ResolveError::ManifestUnreadable { .. } => {
                miette::Report::msg(self.to_diagnostic().format(false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ownership_error(manifest: PathBuf) -> ResolveError {
        ResolveError::UnresolvableOwnership {
            library: LibraryName::new("bitvis_vip_uart"),
            line: 3,
            reference: "/home/dev/fifo.vhd".to_string(),
            manifest,
        }
    }

    #[test]
    fn test_display_carries_context() {
        let err = ownership_error(PathBuf::from("/x/compile_order.txt"));
        assert_eq!(
            err.to_string(),
            "cannot determine the library owning `/home/dev/fifo.vhd` (bitvis_vip_uart, line 3)"
        );
    }

    #[test]
    fn test_to_diagnostic() {
        let err = ownership_error(PathBuf::from("/x/compile_order.txt"));
        let text = err.to_diagnostic().format(false);

        assert!(text.contains("/x/compile_order.txt:3"));
        assert!(text.contains("manifest of `bitvis_vip_uart`"));
        assert!(text.contains("help: consider:"));
    }

    #[test]
    fn test_report_labels_manifest_line() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join("compile_order.txt");
        std::fs::write(&manifest, "../src/a.vhd\n\n/home/dev/fifo.vhd\n").unwrap();

        let report = ownership_error(manifest).to_report();
        let diag = report
            .downcast_ref::<UnresolvableOwnershipError>()
            .unwrap();

        assert_eq!(diag.line, 3);
        let span = diag.span.unwrap();
        assert_eq!(span.offset(), "../src/a.vhd\n\n".len());
        assert_eq!(span.len(), "/home/dev/fifo.vhd".len());
    }

    #[test]
    fn test_report_without_manifest_source() {
        let report = ownership_error(PathBuf::from("/nonexistent/compile_order.txt")).to_report();
        let diag = report
            .downcast_ref::<UnresolvableOwnershipError>()
            .unwrap();

        assert!(diag.src.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.reference, "/home/dev/fifo.vhd");
    }
}
