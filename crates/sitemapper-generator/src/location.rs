//! Absolute locations for sitemap entries.

use sitemapper_core::{Config, Page, Post};

/// Maps items to absolute URLs under the site base.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base: String,
    default_document: String,
    category_path: Option<String>,
}

impl UrlResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.base_url(),
            default_document: config.sitemap.default_document.clone(),
            category_path: config
                .site
                .category_path
                .clone()
                .filter(|p| !p.is_empty()),
        }
    }

    /// Location of a post: the base URL followed by the post URL.
    pub fn post(&self, post: &Post) -> String {
        format!("{}{}", self.base, post.url)
    }

    /// Location of a page, collapsing a trailing default document to its
    /// directory.
    pub fn page(&self, page: &Page) -> String {
        let source_path = page.source_path();
        let location = match &self.category_path {
            Some(prefix) if source_path.starts_with(prefix.as_str()) => {
                format!("{}/{}", self.base, source_path.trim_start_matches('/'))
            }
            _ => format!("{}{}", self.base, page.url),
        };
        self.strip_default_document(location)
    }

    fn strip_default_document(&self, mut location: String) -> String {
        if self.default_document.is_empty() {
            return location;
        }
        let suffix_len = self.default_document.len();
        let is_document = location.ends_with(self.default_document.as_str())
            && location[..location.len() - suffix_len].ends_with('/');
        if is_document {
            location.truncate(location.len() - suffix_len);
        }
        location
    }
}
