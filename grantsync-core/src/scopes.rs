//! Scope set normalization
//!
//! Scope strings arrive in several shapes: the directory stores a single
//! space-delimited string, command lines hand over separate tokens, and
//! users paste comma-separated lists. Everything funnels through
//! [`ScopeSet::parse`] into one canonical form so the planner only ever
//! compares sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A canonical, deduplicated, ordered set of scope tokens.
///
/// Backed by a [`BTreeSet`], so iteration and serialization are always
/// lexicographic ascending and exact duplicates collapse on construction.
/// Comparison is set equality; the serialized wire string is derived, never
/// compared directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw scope string.
    ///
    /// Splits on any run of whitespace and/or commas, discards empty
    /// tokens, deduplicates exact matches. Pure; `parse` of already
    /// canonical output is a no-op.
    pub fn parse(raw: &str) -> Self {
        raw.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Normalize a sequence of command-line style tokens.
    ///
    /// Each token goes through the same splitter, so `["A,B"]`, `["A B"]`
    /// and `["A", "B"]` all produce the same set.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for arg in args {
            set.extend(Self::parse(arg.as_ref()).0);
        }
        Self(set)
    }

    /// The wire form: tokens joined by single spaces, sorted ascending.
    pub fn to_scope_string(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    /// Scopes in `self` or `other`.
    pub fn union(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Scopes in `self` but not in `other`.
    pub fn difference(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Scopes in both `self` and `other`.
    pub fn intersection(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// True when `self` contains every scope in `other`.
    pub fn is_superset(&self, other: &ScopeSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate tokens in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_scope_string())
    }
}
