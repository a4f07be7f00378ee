//! The set of optional groups chosen for one install, and the parser for the
//! menu answer (`1,3`, `all`, or empty).

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;
use tracing::warn;

/// Optional groups chosen for one install run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    groups: BTreeSet<String>,
}

impl Selection {
    /// An empty selection: only mandatory content is installed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every discovered group.
    pub fn all(groups: &[String]) -> Self {
        groups.iter().cloned().collect()
    }

    /// Builds a selection from group names, keeping only names present in
    /// `available`. Unknown names are logged and dropped.
    pub fn from_names<S: AsRef<str>>(names: &[S], available: &[String]) -> Self {
        let mut groups = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if available.iter().any(|g| g == name) {
                groups.insert(name.to_string());
            } else {
                warn!(group = name, "requested group is not in the archive, skipping");
            }
        }
        Self { groups }
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { groups: iter.into_iter().collect() }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(", "))
    }
}

/// A rejected token of the menu answer. Never fatal: the token is reported and
/// skipped, and the remaining tokens are still applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionParseError {
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("number out of range: {0}")]
    OutOfRange(i64),
}

/// Outcome of [`parse_selection`]: the usable selection plus every rejected token
/// in input order.
#[derive(Debug, Clone, Default)]
pub struct ParsedSelection {
    pub selection: Selection,
    pub rejected: Vec<SelectionParseError>,
}

/// Parses a menu answer against the group list as it was displayed (sorted,
/// numbered from 1).
///
/// * `all` (any case) selects every group.
/// * an empty answer selects nothing.
/// * otherwise a comma-separated list of 1-based numbers.
pub fn parse_selection(input: &str, groups: &[String]) -> ParsedSelection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return ParsedSelection { selection: Selection::all(groups), rejected: Vec::new() };
    }

    let mut chosen = BTreeSet::new();
    let mut rejected = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let n: i64 = match token.parse() {
            Ok(n) => n,
            Err(_) => {
                rejected.push(SelectionParseError::NotANumber(token.to_string()));
                continue;
            }
        };
        match usize::try_from(n).ok().filter(|&i| i >= 1 && i <= groups.len()) {
            Some(i) => {
                chosen.insert(groups[i - 1].clone());
            }
            None => rejected.push(SelectionParseError::OutOfRange(n)),
        }
    }

    ParsedSelection { selection: Selection { groups: chosen }, rejected }
}
