//! Include/exclude filtering of discovered repositories

use std::collections::HashSet;

use super::discovery::RepoCandidate;

const EXCLUDE_PREFIX: char = '!';

/// Parsed form of a comma-delimited filter expression such as `"baz, !qux"`
///
/// Tokens are trimmed and lower-cased. Tokens starting with `!` are excludes.
/// Empty tokens are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub includes: HashSet<String>,
    pub excludes: HashSet<String>,
}

impl FilterSpec {
    pub fn parse(expression: &str) -> Self {
        let mut spec = FilterSpec::default();

        for token in expression.split(',') {
            let token = token.trim().to_lowercase();
            match token.strip_prefix(EXCLUDE_PREFIX) {
                Some(excluded) => {
                    let excluded = excluded.trim();
                    if !excluded.is_empty() {
                        spec.excludes.insert(excluded.to_string());
                    }
                }
                None if !token.is_empty() => {
                    spec.includes.insert(token);
                }
                None => {}
            }
        }

        spec
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Substring match on the lower-cased path. Excludes win over includes.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.to_lowercase();

        if !self.includes.is_empty() && !self.includes.iter().any(|inc| path.contains(inc.as_str())) {
            return false;
        }

        !self.excludes.iter().any(|exc| path.contains(exc.as_str()))
    }
}

/// Keeps the candidates whose path passes `spec`, preserving their order
pub fn filter_repos(candidates: Vec<RepoCandidate>, spec: &FilterSpec) -> Vec<RepoCandidate> {
    if spec.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| spec.matches(&candidate.path.to_string_lossy()))
        .collect()
}
