//! Recoverable problems found while generating a sitemap.
//!
//! Nothing here aborts a run. Each warning is logged as it is recorded and
//! handed back with the generated sitemap.

use std::fmt;

use tracing::warn;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Change frequency outside the protocol enumeration.
    InvalidFrequency,
    /// Priority that is not a number in `[0.0, 1.0]`.
    InvalidPriority,
    /// Explicit last-modified value that is not a date.
    InvalidLastmod,
    /// Layout chain that refers back to itself.
    LayoutCycle,
    /// Filter pattern that is not a valid glob.
    InvalidPattern,
}

impl WarningKind {
    fn describe(self) -> &'static str {
        match self {
            Self::InvalidFrequency => "invalid change frequency",
            Self::InvalidPriority => "invalid priority",
            Self::InvalidLastmod => "invalid last-modified date",
            Self::LayoutCycle => "layout cycle",
            Self::InvalidPattern => "invalid pattern",
        }
    }
}

/// One recoverable problem, naming the offending item and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Item path, or `configuration (<category>)` for configured defaults.
    pub item: String,
    pub kind: WarningKind,
    /// Offending value as written.
    pub value: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.kind.describe(), self.item, self.value)
    }
}

/// Warning sink for a single run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record a warning.
    pub fn warn(&mut self, item: impl Into<String>, kind: WarningKind, value: impl Into<String>) {
        let warning = Warning {
            item: item.into(),
            kind,
            value: value.into(),
        };
        warn!(item = %warning.item, value = %warning.value, "{}", kind.describe());
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
