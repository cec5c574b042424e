//! Sitemap protocol field validation.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Value that does not belong to the change frequency enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid change frequency: {0}")]
pub struct InvalidChangeFreq(pub String);

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Protocol token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = InvalidChangeFreq;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(InvalidChangeFreq(s.to_string())),
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value that is not a number in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority: {0}")]
pub struct InvalidPriority(pub String);

/// Sitemap priority, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(f64);

impl Priority {
    /// Wrap `value` if it is a finite number within range.
    pub fn new(value: f64) -> Option<Self> {
        // Adding zero turns -0.0 into 0.0.
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value + 0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidPriority(s.to_string()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole numbers keep one decimal place: "1.0", not "1".
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Whether `token` names a change frequency, ignoring case.
pub fn valid_frequency(token: &str) -> bool {
    token.parse::<ChangeFreq>().is_ok()
}

/// Whether `raw` parses as a number within `[0.0, 1.0]`.
pub fn valid_priority(raw: &str) -> bool {
    raw.parse::<Priority>().is_ok()
}
