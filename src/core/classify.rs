//! Path classification: which library owns a manifest reference.
//!
//! A manifest may list files belonging to other libraries (a VIP's compile
//! order pulls in the framework packages it depends on). Ownership is decided
//! by an ordered list of rules; the first rule that matches wins:
//!
//! 1. [`ClassifyRule::TargetDependent`] - a segment equals the
//!    target-dependent marker: the current library owns it, even when
//!    another segment happens to match a library name.
//! 2. [`ClassifyRule::NearestLibrarySegment`] - the rightmost segment equal
//!    to a known library name owns it.
//! 3. [`ClassifyRule::OwnSourceTree`] - the reference contains the
//!    own-source marker (`../src`): the current library owns it.
//! 4. [`ClassifyRule::ParentRelative`] - the reference starts with `../`:
//!    the current library owns it. This also accepts references that meant
//!    some other relative location.
//!
//! No match is an error; there is no default owner.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::manifest::PathExpr;
use crate::core::LibraryName;

/// Directory holding target-dependent sources of the library being read.
pub const TARGET_DEPENDENT_MARKER: &str = "src_target_dependent";

/// Relative prefix of a library's own source tree, seen from its script dir.
pub const OWN_SOURCE_MARKER: &str = "../src";

/// One-level-up relative prefix.
pub const PARENT_PREFIX: &str = "../";

/// A classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifyRule {
    TargetDependent,
    NearestLibrarySegment,
    OwnSourceTree,
    ParentRelative,
}

impl ClassifyRule {
    /// Evaluation order used by [`Classifier::new`].
    pub const DEFAULT_ORDER: [ClassifyRule; 4] = [
        ClassifyRule::TargetDependent,
        ClassifyRule::NearestLibrarySegment,
        ClassifyRule::OwnSourceTree,
        ClassifyRule::ParentRelative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifyRule::TargetDependent => "target-dependent",
            ClassifyRule::NearestLibrarySegment => "nearest-library-segment",
            ClassifyRule::OwnSourceTree => "own-source-tree",
            ClassifyRule::ParentRelative => "parent-relative",
        }
    }

    /// Apply this rule alone. `None` means the rule does not decide.
    fn apply(
        &self,
        reference: &PathExpr,
        current: &LibraryName,
        known: &HashSet<LibraryName>,
        markers: &Markers,
    ) -> Option<LibraryName> {
        match self {
            ClassifyRule::TargetDependent => reference
                .has_segment(&markers.target_dependent)
                .then(|| current.clone()),
            ClassifyRule::NearestLibrarySegment => reference
                .segments()
                .rev()
                .find_map(|segment| known.get(segment).cloned()),
            ClassifyRule::OwnSourceTree => reference
                .contains(&markers.own_source)
                .then(|| current.clone()),
            ClassifyRule::ParentRelative => reference
                .starts_with(PARENT_PREFIX)
                .then(|| current.clone()),
        }
    }
}

impl fmt::Display for ClassifyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markers recognised by the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub target_dependent: String,
    pub own_source: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            target_dependent: TARGET_DEPENDENT_MARKER.to_string(),
            own_source: OWN_SOURCE_MARKER.to_string(),
        }
    }
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub owner: LibraryName,
    pub rule: ClassifyRule,
}

/// No rule attributed the reference to a library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot determine the library owning `{reference}` (current library `{library}`)")]
pub struct ClassifyError {
    pub reference: String,
    pub library: LibraryName,
}

/// Decides the owning library of manifest references.
#[derive(Debug, Clone)]
pub struct Classifier {
    known: HashSet<LibraryName>,
    markers: Markers,
    rules: Vec<ClassifyRule>,
}

impl Classifier {
    /// Classifier over the given known library names, with default markers
    /// and the default rule order.
    pub fn new(known: impl IntoIterator<Item = LibraryName>) -> Self {
        Classifier {
            known: known.into_iter().collect(),
            markers: Markers::default(),
            rules: ClassifyRule::DEFAULT_ORDER.to_vec(),
        }
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Replace the rule list. Rules are tried in the given order.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ClassifyRule>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    pub fn rules(&self) -> &[ClassifyRule] {
        &self.rules
    }

    pub fn is_known(&self, library: &str) -> bool {
        self.known.contains(library)
    }

    /// Find the library owning `reference` while reading the manifest of `current`.
    pub fn classify(
        &self,
        reference: &PathExpr,
        current: &LibraryName,
    ) -> Result<Classification, ClassifyError> {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.apply(reference, current, &self.known, &self.markers)
                    .map(|owner| Classification { owner, rule: *rule })
            })
            .ok_or_else(|| ClassifyError {
                reference: reference.as_str().to_string(),
                library: current.clone(),
            })
    }
}
