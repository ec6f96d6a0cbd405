use std::collections::HashSet;

/// Drop every failure that is the parent of another failure.
///
/// When a subtest fails go also reports its parent as failed, so only the
/// deepest names identify what actually broke. Order of first appearance is
/// kept and duplicates of a leaf are not merged.
pub fn leaf_failures(names: Vec<String>) -> Vec<String> {
    let ancestors: HashSet<&str> = names
        .iter()
        .flat_map(|name| name.match_indices('/').map(move |(i, _)| &name[..i]))
        .collect();

    names
        .iter()
        .filter(|name| !ancestors.contains(name.as_str()))
        .cloned()
        .collect()
}

/// A failing module together with the log excerpt that reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    module: String,
    failed_tests: Vec<String>,
    excerpt: Vec<u8>,
}

impl ModuleFailure {
    /// Returns `None` when no failed test was found in the excerpt.
    pub fn new(
        module: impl Into<String>,
        failed_tests: Vec<String>,
        excerpt: Vec<u8>,
    ) -> Option<Self> {
        if failed_tests.is_empty() {
            return None;
        }
        Some(Self {
            module: module.into(),
            failed_tests,
            excerpt,
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// All leaf failures in order of appearance
    pub fn failed_tests(&self) -> &[String] {
        &self.failed_tests
    }

    /// The failure the excerpt is filed under.
    ///
    /// Only the first leaf names the output even when the segment reports
    /// several unrelated failures.
    pub fn canonical_test(&self) -> &str {
        self.failed_tests
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn excerpt(&self) -> &[u8] {
        &self.excerpt
    }

    pub fn into_excerpt(self) -> Vec<u8> {
        self.excerpt
    }
}
