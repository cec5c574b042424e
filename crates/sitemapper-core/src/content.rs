//! Content items handed to the sitemap engine.
//!
//! These are produced by whatever content store sits in front of the engine;
//! the engine only reads them.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    metadata::{Metadata, Timestamp, read_frontmatter},
};

/// Metadata key naming the layout an item or layout is rendered through.
pub const LAYOUT_KEY: &str = "layout";

/// A dated post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Logical path used for exclusion matching (e.g. "/_posts/2020-01-01-hello.md").
    pub path: String,

    /// Rendered URL relative to the site base (e.g. "/2020/01/01/hello.html").
    pub url: String,

    /// Authorship date.
    pub date: Timestamp,

    /// Front matter.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A standalone page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Directory the page lives in, relative to the site source (e.g. "/blog/").
    pub dir: String,

    /// File name (e.g. "index.html").
    pub name: String,

    /// Rendered URL relative to the site base.
    pub url: String,

    /// On-disk source file; its modification time dates the page.
    pub source: PathBuf,

    /// Front matter.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Page {
    /// Logical source path: `dir` and `name` joined with a single `/`.
    pub fn source_path(&self) -> String {
        let dir = self.dir.trim_end_matches('/');
        let name = self.name.trim_start_matches('/');
        if dir.is_empty() && !self.dir.starts_with('/') {
            name.to_string()
        } else {
            format!("{dir}/{name}")
        }
    }

    /// Name of the layout this page renders through, if any.
    pub fn layout(&self) -> Option<String> {
        self.metadata.get_string(LAYOUT_KEY)
    }
}

/// A template pages are rendered through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Layout name as referenced from front matter.
    pub name: String,

    /// On-disk template file.
    pub path: PathBuf,

    /// Name of the layout this one is wrapped in.
    #[serde(default)]
    pub parent: Option<String>,
}

impl Layout {
    /// Create a layout with an explicit parent.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            parent: parent.map(str::to_string),
        }
    }

    /// Read a layout file, taking its parent from the `layout` front matter key.
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self> {
        let metadata = read_frontmatter(path)?;
        Ok(Self {
            name: name.into(),
            path: path.to_path_buf(),
            parent: metadata.get_string(LAYOUT_KEY),
        })
    }
}

/// Everything the engine needs to know about a site's content.
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    /// Posts in collection order.
    pub posts: Vec<Post>,

    /// Pages in collection order.
    pub pages: Vec<Page>,

    /// Layouts by name.
    pub layouts: HashMap<String, Layout>,
}

impl SiteContent {
    /// Register a layout under its own name.
    pub fn add_layout(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::parse_date;

    fn page(dir: &str, name: &str) -> Page {
        Page {
            dir: dir.to_string(),
            name: name.to_string(),
            url: String::new(),
            source: PathBuf::from(name),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_source_path_joins_single_slash() {
        assert_eq!(page("/", "index.html").source_path(), "/index.html");
        assert_eq!(page("/blog/", "index.html").source_path(), "/blog/index.html");
        assert_eq!(page("/blog", "about.md").source_path(), "/blog/about.md");
        assert_eq!(page("", "feed.xml").source_path(), "feed.xml");
    }

    #[test]
    fn test_page_layout() {
        let mut p = page("/", "about.md");
        assert_eq!(p.layout(), None);
        p.metadata.insert(LAYOUT_KEY, "page");
        assert_eq!(p.layout().as_deref(), Some("page"));
    }

    #[test]
    fn test_layout_load_reads_parent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let child = dir.path().join("post.html");
        let root = dir.path().join("default.html");
        std::fs::write(&child, "---\nlayout: default\n---\n<article/>").expect("write");
        std::fs::write(&root, "<html>{{ content }}</html>").expect("write");

        let post = Layout::load("post", &child).expect("load post layout");
        let default = Layout::load("default", &root).expect("load default layout");

        assert_eq!(post.parent.as_deref(), Some("default"));
        assert_eq!(default.parent, None);
    }

    #[test]
    fn test_layout_load_missing_file() {
        assert!(Layout::load("gone", Path::new("/nonexistent/gone.html")).is_err());
    }

    #[test]
    fn test_site_content_add_layout() {
        let mut site = SiteContent::default();
        site.add_layout(Layout::new("page", "_layouts/page.html", Some("default")));
        assert_eq!(
            site.layouts["page"].parent.as_deref(),
            Some("default")
        );
    }

    #[test]
    fn test_post_deserializes_with_default_metadata() {
        let post: Post = serde_yaml::from_str(
            "path: /_posts/hello.md\nurl: /hello.html\ndate: 2020-01-01T00:00:00+00:00\n",
        )
        .expect("deserialize post");
        assert!(post.metadata.is_empty());
        assert_eq!(Some(post.date), parse_date("2020-01-01"));
    }
}
