//! Include/exclude decisions over item paths.
//!
//! Patterns use shell wildcards (`*`, `?`, `[...]`), are case-sensitive, and
//! `*` may span `/`, so `/feed*` covers `/feed/index.xml`.

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::diagnostics::{Diagnostics, WarningKind};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Matcher {
    Glob(Pattern),
    Literal(String),
}

impl Matcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Glob(pattern) => pattern.matches_with(path, MATCH_OPTIONS),
            Self::Literal(literal) => literal == path,
        }
    }
}

/// A compiled list of glob patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Matcher>,
}

impl PatternSet {
    /// Compile `patterns`. An invalid pattern is reported and then matched
    /// literally.
    pub fn new(patterns: &[String], diagnostics: &mut Diagnostics) -> Self {
        let patterns = patterns
            .iter()
            .map(|raw| match Pattern::new(&collapse_stars(raw)) {
                Ok(pattern) => Matcher::Glob(pattern),
                Err(e) => {
                    debug!(pattern = %raw, error = %e, "falling back to literal match");
                    diagnostics.warn("configuration", WarningKind::InvalidPattern, raw.clone());
                    Matcher::Literal(raw.clone())
                }
            })
            .collect();
        Self { patterns }
    }

    /// Whether any pattern matches `path`.
    pub fn is_match(&self, path: &str) -> bool {
        self.patterns.iter().any(|m| m.matches(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Reduce every run of `*` to a single `*`. Without path-aware matching a
/// `**` means the same as `*`, and `glob` rejects it outside a whole segment.
fn collapse_stars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Exclusion and index classification for one run.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    exclude: PatternSet,
    index: PatternSet,
}

impl Filter {
    pub fn new(exclude: PatternSet, index: PatternSet) -> Self {
        Self { exclude, index }
    }

    /// Whether the item at `path` is left out of the sitemap.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.is_match(path)
    }

    /// Whether the page at `path` is dated by the newest content on the site.
    pub fn is_index_like(&self, path: &str) -> bool {
        self.index.is_match(path)
    }
}
