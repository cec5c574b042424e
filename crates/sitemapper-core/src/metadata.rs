//! Item metadata and front matter reading.
//!
//! Metadata is an open string-keyed map. The sitemap engine never reaches for
//! a field directly; it asks for a string or a date under a configurable key.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{CoreError, Result};

/// Timestamp with the offset it was written in.
pub type Timestamp = DateTime<FixedOffset>;

/// Front matter delimiter.
const DELIMITER: &str = "---";

/// Arbitrary key/value metadata attached to a post, page or layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(HashMap<String, Value>);

impl Metadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a non-null value is present under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Scalar value under `key` rendered as text.
    ///
    /// Strings come back verbatim, numbers and booleans in their YAML form.
    /// Nulls, sequences and mappings are treated as absent.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_scalar(key)?.ok()
    }

    /// Scalar value under `key`, distinguishing absent from unusable.
    ///
    /// `None` when the key is absent or null, `Some(Ok(text))` for a scalar,
    /// and `Some(Err(raw))` for a sequence, mapping or tagged value, with
    /// `raw` rendered as flow-style YAML for reporting.
    pub fn get_scalar(&self, key: &str) -> Option<std::result::Result<String, String>> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Ok(s.clone())),
            Value::Number(n) => Some(Ok(n.to_string())),
            Value::Bool(b) => Some(Ok(b.to_string())),
            other => Some(Err(render_value(other))),
        }
    }

    /// Date value under `key`.
    ///
    /// `None` when the key is absent, `Some(Err(raw))` when a value is present
    /// but is not a recognizable date.
    pub fn get_date(&self, key: &str) -> Option<std::result::Result<Timestamp, String>> {
        Some(match self.get_scalar(key)? {
            Ok(raw) => parse_date(&raw).ok_or(raw),
            Err(raw) => Err(raw),
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a YAML mapping into metadata. Empty input yields empty metadata.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Compact single-line YAML rendering of a non-scalar value.
fn render_value(value: &Value) -> String {
    match serde_yaml::to_string(value) {
        Ok(text) => text.trim().lines().collect::<Vec<_>>().join(" "),
        Err(_) => format!("{value:?}"),
    }
}

/// Parse the date formats accepted in front matter.
///
/// Values without an offset are taken as UTC; bare dates as UTC midnight.
pub fn parse_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Split content into the front matter block and the body.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let after_first = content.strip_prefix(DELIMITER)?;

    let closing_pos = after_first.find(DELIMITER)?;
    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + DELIMITER.len()..].trim_start();

    Some((frontmatter, body))
}

/// Parse the front matter of `content`; content without front matter has
/// empty metadata.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Metadata> {
    let Some((fm_str, _body)) = split_frontmatter(content) else {
        return Ok(Metadata::default());
    };

    Metadata::from_yaml_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))
}

/// Read a file and parse its front matter.
pub fn read_frontmatter(path: &Path) -> Result<Metadata> {
    let content = std::fs::read_to_string(path)?;
    parse_frontmatter(&content, path)
}
