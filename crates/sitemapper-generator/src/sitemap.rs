//! Sitemap generation.
//!
//! Walks posts and then pages in collection order, builds one entry per
//! included item, and threads the site-wide latest date from item to item so
//! index pages can report the newest content on the site.

use sitemapper_core::{Config, CoreError, SiteContent, Timestamp};
use thiserror::Error;
use tracing::debug;

use crate::{
    dates::{DateResolver, LatestDate},
    diagnostics::{Diagnostics, Warning},
    entry::{EntryBuilder, Item, SitemapEntry},
    filter::{Filter, PatternSet},
    location::UrlResolver,
    xml,
};

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Configuration rejected before generation.
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    /// XML encoding error.
    #[error("XML encoding error: {0}")]
    Xml(String),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Outcome of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    /// Entries in output order: posts first, then pages.
    pub entries: Vec<SitemapEntry>,

    /// Recoverable problems met along the way.
    pub warnings: Vec<Warning>,

    /// Newest date observed across posts and ordinary pages.
    pub latest: Option<Timestamp>,
}

impl Sitemap {
    /// Serialize to XML.
    pub fn to_xml(&self) -> Result<String> {
        xml::to_xml(&self.entries)
    }
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
    urls: UrlResolver,
    filter: Filter,
    pattern_warnings: Vec<Warning>,
}

impl SitemapGenerator {
    /// Create a new sitemap generator, validating the site URL and compiling
    /// the filter patterns.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut diagnostics = Diagnostics::new();
        let filter = Filter::new(
            PatternSet::new(&config.sitemap.exclude, &mut diagnostics),
            PatternSet::new(&config.sitemap.include_posts, &mut diagnostics),
        );

        Ok(Self {
            urls: UrlResolver::new(&config),
            filter,
            config,
            pattern_warnings: diagnostics.into_warnings(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build all entries for `content`.
    pub fn generate(&self, content: &SiteContent) -> Sitemap {
        debug!(
            posts = content.posts.len(),
            pages = content.pages.len(),
            "generating sitemap"
        );

        let mut diagnostics = Diagnostics::new();
        let dates = DateResolver::new(&content.layouts, &self.config.sitemap.lastmod_name);
        let builder = EntryBuilder::new(&self.config, &self.urls, dates);

        let mut entries = Vec::with_capacity(content.posts.len() + content.pages.len());
        let mut latest = LatestDate::new();

        for post in &content.posts {
            if self.filter.is_excluded(&post.path) {
                debug!(path = %post.path, "excluded post");
                continue;
            }
            let (entry, next) = builder.build(Item::Post(post), latest, &mut diagnostics);
            latest = next;
            entries.push(entry);
        }

        for page in &content.pages {
            let path = page.source_path();
            if self.filter.is_excluded(&path) {
                debug!(%path, "excluded page");
                continue;
            }
            if !page.source.exists() {
                debug!(%path, source = %page.source.display(), "skipping page without source file");
                continue;
            }

            let item = if self.filter.is_index_like(&path) {
                Item::Index(page)
            } else {
                Item::Page(page)
            };
            let (entry, next) = builder.build(item, latest, &mut diagnostics);
            latest = next;
            entries.push(entry);
        }

        let mut warnings = self.pattern_warnings.clone();
        warnings.extend(diagnostics.into_warnings());

        Sitemap {
            entries,
            warnings,
            latest: latest.get(),
        }
    }

    /// Render a generated sitemap as XML.
    pub fn render(&self, sitemap: &Sitemap) -> Result<String> {
        sitemap.to_xml()
    }

    /// Generate and render in one step.
    pub fn generate_xml(&self, content: &SiteContent) -> Result<String> {
        self.render(&self.generate(content))
    }
}
