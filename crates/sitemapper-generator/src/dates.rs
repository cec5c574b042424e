//! Last-modified date resolution.
//!
//! An explicit `lastmod` in an item's metadata always wins. Otherwise posts
//! fall back to their authorship date, pages to their file time advanced
//! through their layout chain, and index pages to the newest date seen so
//! far on the site.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use chrono::{DateTime, Utc};
use sitemapper_core::{Layout, Metadata, Page, Post, Timestamp};
use tracing::debug;

use crate::diagnostics::{Diagnostics, WarningKind};

/// Running maximum of the effective dates observed during a run.
///
/// Starts empty; the first observed date seeds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestDate(Option<Timestamp>);

impl LatestDate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator after observing `date`.
    #[must_use]
    pub fn observe(self, date: Timestamp) -> Self {
        match self.0 {
            Some(current) if current >= date => self,
            _ => Self(Some(date)),
        }
    }

    pub fn get(self) -> Option<Timestamp> {
        self.0
    }
}

/// Modification time of `path` in UTC, if the file can be inspected.
pub fn file_mtime(path: &Path) -> Option<Timestamp> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified).fixed_offset())
}

/// Resolves effective dates for one run.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver<'a> {
    layouts: &'a HashMap<String, Layout>,
    lastmod_key: &'a str,
}

impl<'a> DateResolver<'a> {
    pub fn new(layouts: &'a HashMap<String, Layout>, lastmod_key: &'a str) -> Self {
        Self {
            layouts,
            lastmod_key,
        }
    }

    /// Explicit date from metadata. An unparseable value is reported and
    /// treated as absent.
    fn explicit(&self, item: &str, metadata: &Metadata, diagnostics: &mut Diagnostics) -> Option<Timestamp> {
        match metadata.get_date(self.lastmod_key)? {
            Ok(date) => Some(date),
            Err(raw) => {
                diagnostics.warn(item, WarningKind::InvalidLastmod, raw);
                None
            }
        }
    }

    /// Date of a post; always known.
    pub fn post(
        &self,
        post: &Post,
        latest: LatestDate,
        diagnostics: &mut Diagnostics,
    ) -> (Timestamp, LatestDate) {
        let date = self
            .explicit(&post.path, &post.metadata, diagnostics)
            .unwrap_or(post.date);
        (date, latest.observe(date))
    }

    /// Date of an ordinary page.
    pub fn page(
        &self,
        page: &Page,
        latest: LatestDate,
        diagnostics: &mut Diagnostics,
    ) -> (Option<Timestamp>, LatestDate) {
        let path = page.source_path();
        let date = match self.explicit(&path, &page.metadata, diagnostics) {
            Some(date) => Some(date),
            None => file_mtime(&page.source)
                .map(|mtime| self.through_layouts(&path, page.layout(), mtime, diagnostics)),
        };

        let latest = date.map_or(latest, |d| latest.observe(d));
        (date, latest)
    }

    /// Date of an index page. Index pages read the accumulator but never feed it.
    pub fn index(
        &self,
        page: &Page,
        latest: LatestDate,
        diagnostics: &mut Diagnostics,
    ) -> Option<Timestamp> {
        self.explicit(&page.source_path(), &page.metadata, diagnostics)
            .or(latest.get())
    }

    /// Advance `candidate` to the newest layout file time along the chain
    /// starting at `start`.
    ///
    /// Stops after a layout without a parent, at a layout name that is not
    /// known, or when a name repeats.
    pub fn through_layouts(
        &self,
        item: &str,
        start: Option<String>,
        mut candidate: Timestamp,
        diagnostics: &mut Diagnostics,
    ) -> Timestamp {
        let mut visited = HashSet::new();
        let mut next = start;

        while let Some(name) = next {
            if !visited.insert(name.clone()) {
                diagnostics.warn(item, WarningKind::LayoutCycle, name);
                break;
            }
            let Some(layout) = self.layouts.get(&name) else {
                debug!(item, layout = %name, "unknown layout, stopping chain");
                break;
            };
            if let Some(mtime) = file_mtime(&layout.path)
                && mtime > candidate
            {
                candidate = mtime;
            }
            next = layout.parent.clone();
        }

        candidate
    }
}
