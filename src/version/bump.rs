//! Conventional commit classification and bump aggregation.

use std::fmt;

use regex_lite::Regex;

/// Semantic-version bump category derived from commits.
///
/// Ordered by severity: `Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BumpCategory {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpCategory::Major => write!(f, "MAJOR"),
            BumpCategory::Minor => write!(f, "MINOR"),
            BumpCategory::Patch => write!(f, "PATCH"),
        }
    }
}

/// Classify a commit message against conventional-commit grammar.
///
/// Returns `None` for empty or non-conventional messages; such commits are
/// ignored by aggregation rather than treated as errors. Breaking-change
/// markers take priority over the feat/fix prefixes, even when both are
/// present in the same message.
///
/// The type-token patterns are anchored to the start of the subject (a
/// message that merely contains "feat:" mid-sentence does not count); the
/// `BREAKING CHANGE` body marker is unanchored and may sit anywhere in a
/// multi-line message.
pub fn classify_commit(message: &str) -> Option<BumpCategory> {
    if message.is_empty() {
        return None;
    }

    // `!` directly after the type token, optionally after a scope:
    // feat!: / feat(api)!:
    let breaking_prefix = Regex::new(r"(?i)^[a-z]+(\([^)]+\))?!:").unwrap();
    let breaking_marker = Regex::new(r"(?i)BREAKING CHANGE").unwrap();

    if breaking_prefix.is_match(message) || breaking_marker.is_match(message) {
        return Some(BumpCategory::Major);
    }

    let feat = Regex::new(r"(?i)^feat(\([^)]+\))?:").unwrap();
    if feat.is_match(message) {
        return Some(BumpCategory::Minor);
    }

    let fix = Regex::new(r"(?i)^fix(\([^)]+\))?:").unwrap();
    if fix.is_match(message) {
        return Some(BumpCategory::Patch);
    }

    None
}

/// Reduce a sequence of commit messages to a single bump category.
///
/// Classifies every commit and takes the maximum severity among the
/// recognized ones. An empty list, or a list with no conventional commits at
/// all, yields [`BumpCategory::Patch`]: a release with nothing classifiable
/// is still a patch-level change by policy.
///
/// The scan is deliberately exhaustive rather than short-circuiting on the
/// first MAJOR, so the result is independent of commit order.
pub fn aggregate_bump<I, S>(commits: I) -> BumpCategory
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    commits
        .into_iter()
        .filter_map(|c| classify_commit(c.as_ref()))
        .max()
        .unwrap_or(BumpCategory::Patch)
}
