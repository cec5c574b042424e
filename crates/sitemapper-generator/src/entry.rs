//! Assembly of single sitemap entries.

use sitemapper_core::{
    CategoryDefaults, Config, Metadata, Page, Post, Setting, SitemapConfig, Timestamp,
};

use crate::{
    dates::{DateResolver, LatestDate},
    diagnostics::{Diagnostics, WarningKind},
    location::UrlResolver,
    validate::{ChangeFreq, Priority},
};

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<Timestamp>,

    /// Change frequency.
    pub changefreq: Option<ChangeFreq>,

    /// Priority (0.0 to 1.0).
    pub priority: Option<Priority>,
}

impl SitemapEntry {
    /// Entry with only a location.
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

/// Which configured defaults apply to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Posts,
    Pages,
    Index,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Pages => "pages",
            Self::Index => "index",
        }
    }
}

/// An item routed to the entry builder.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    Post(&'a Post),
    Page(&'a Page),
    Index(&'a Page),
}

impl Item<'_> {
    pub fn category(&self) -> Category {
        match self {
            Self::Post(_) => Category::Posts,
            Self::Page(_) => Category::Pages,
            Self::Index(_) => Category::Index,
        }
    }

    /// Logical path, used to name the item in warnings.
    pub fn path(&self) -> String {
        match self {
            Self::Post(post) => post.path.clone(),
            Self::Page(page) | Self::Index(page) => page.source_path(),
        }
    }

    fn metadata(&self) -> &Metadata {
        match self {
            Self::Post(post) => &post.metadata,
            Self::Page(page) | Self::Index(page) => &page.metadata,
        }
    }
}

/// Builds one entry per item from its metadata and the category defaults.
#[derive(Debug, Clone, Copy)]
pub struct EntryBuilder<'a> {
    settings: &'a SitemapConfig,
    urls: &'a UrlResolver,
    dates: DateResolver<'a>,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(config: &'a Config, urls: &'a UrlResolver, dates: DateResolver<'a>) -> Self {
        Self {
            settings: &config.sitemap,
            urls,
            dates,
        }
    }

    /// Build the entry for `item`, returning the updated site-wide latest date.
    pub fn build(
        &self,
        item: Item<'_>,
        latest: LatestDate,
        diagnostics: &mut Diagnostics,
    ) -> (SitemapEntry, LatestDate) {
        let (loc, lastmod, latest) = match item {
            Item::Post(post) => {
                let (date, latest) = self.dates.post(post, latest, diagnostics);
                (self.urls.post(post), Some(date), latest)
            }
            Item::Page(page) => {
                let (date, latest) = self.dates.page(page, latest, diagnostics);
                (self.urls.page(page), date, latest)
            }
            Item::Index(page) => {
                let date = self.dates.index(page, latest, diagnostics);
                (self.urls.page(page), date, latest)
            }
        };

        let entry = SitemapEntry {
            loc,
            lastmod,
            changefreq: self.change_frequency(&item, diagnostics),
            priority: self.priority(&item, diagnostics),
        };
        (entry, latest)
    }

    fn change_frequency(&self, item: &Item<'_>, diagnostics: &mut Diagnostics) -> Option<ChangeFreq> {
        let category = item.category();
        resolve_field(
            item,
            item.metadata().get_scalar(&self.settings.change_frequency_name),
            category_default(&self.settings.frequency, category),
            WarningKind::InvalidFrequency,
            diagnostics,
        )
    }

    fn priority(&self, item: &Item<'_>, diagnostics: &mut Diagnostics) -> Option<Priority> {
        let category = item.category();
        resolve_field(
            item,
            item.metadata().get_scalar(&self.settings.priority_name),
            category_default(&self.settings.priority, category),
            WarningKind::InvalidPriority,
            diagnostics,
        )
    }
}

fn category_default(
    defaults: &CategoryDefaults,
    category: Category,
) -> Option<&Setting> {
    match category {
        Category::Posts => defaults.posts.as_ref(),
        Category::Pages => defaults.pages.as_ref(),
        Category::Index => defaults.index.as_ref(),
    }
}

/// Item value if present, otherwise the category default. Whichever source
/// is consulted, an invalid value is reported and the field omitted; an
/// invalid item value does not fall through to the default.
fn resolve_field<T: std::str::FromStr>(
    item: &Item<'_>,
    own: Option<Result<String, String>>,
    default: Option<&Setting>,
    kind: WarningKind,
    diagnostics: &mut Diagnostics,
) -> Option<T> {
    let (raw, source) = match (own, default) {
        (Some(Ok(raw)), _) => (raw, item.path()),
        (Some(Err(raw)), _) => {
            diagnostics.warn(item.path(), kind, raw);
            return None;
        }
        (None, Some(setting)) => (
            setting.as_text(),
            format!("configuration ({})", item.category().as_str()),
        ),
        (None, None) => return None,
    };

    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            diagnostics.warn(source, kind, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use sitemapper_core::{Layout, metadata::parse_date};

    use super::*;

    fn ts(raw: &str) -> Timestamp {
        parse_date(raw).expect("valid date")
    }

    fn post(metadata: Metadata) -> Post {
        Post {
            path: "/_posts/2020-01-01-hello.md".to_string(),
            url: "/2020/01/01/hello.html".to_string(),
            date: ts("2020-01-01"),
            metadata,
        }
    }

    fn missing_page(name: &str, metadata: Metadata) -> Page {
        Page {
            dir: "/".to_string(),
            name: name.to_string(),
            url: format!("/{name}"),
            source: PathBuf::from("/nonexistent").join(name),
            metadata,
        }
    }

    struct Fixture {
        config: Config,
        urls: UrlResolver,
        layouts: HashMap<String, Layout>,
    }

    impl Fixture {
        fn new(config: Config) -> Self {
            Self {
                urls: UrlResolver::new(&config),
                config,
                layouts: HashMap::new(),
            }
        }

        fn build(&self, item: Item<'_>, latest: LatestDate) -> (SitemapEntry, LatestDate, Diagnostics) {
            let dates = DateResolver::new(&self.layouts, &self.config.sitemap.lastmod_name);
            let builder = EntryBuilder::new(&self.config, &self.urls, dates);
            let mut diagnostics = Diagnostics::new();
            let (entry, latest) = builder.build(item, latest, &mut diagnostics);
            (entry, latest, diagnostics)
        }
    }

    fn site() -> Config {
        Config::for_site("https://example.com")
    }

    #[test]
    fn test_post_entry_without_overrides() {
        let fixture = Fixture::new(site());
        let post = post(Metadata::new());

        let (entry, latest, diagnostics) = fixture.build(Item::Post(&post), LatestDate::new());

        assert_eq!(entry.loc, "https://example.com/2020/01/01/hello.html");
        assert_eq!(entry.lastmod, Some(ts("2020-01-01")));
        assert_eq!(entry.changefreq, None);
        assert_eq!(entry.priority, None);
        assert_eq!(latest.get(), Some(ts("2020-01-01")));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_item_frequency_is_lowercased() {
        let fixture = Fixture::new(site());
        let page = missing_page("about.html", Metadata::new().with("change_frequency", "Daily"));

        let (entry, _, diagnostics) = fixture.build(Item::Page(&page), LatestDate::new());

        assert_eq!(entry.changefreq, Some(ChangeFreq::Daily));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_out_of_range_priority_is_omitted_with_warning() {
        let mut config = site();
        config.sitemap.priority.pages = Some(Setting::Number(0.3));
        let fixture = Fixture::new(config);
        let page = missing_page("about.html", Metadata::new().with("priority", "1.5"));

        let (entry, _, diagnostics) = fixture.build(Item::Page(&page), LatestDate::new());

        assert_eq!(entry.priority, None);
        let warnings = diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidPriority);
        assert_eq!(warnings[0].item, "/about.html");
        assert_eq!(warnings[0].value, "1.5");
    }

    #[test]
    fn test_category_defaults_apply() {
        let mut config = site();
        config.sitemap.frequency.posts = Some(Setting::from("Weekly"));
        config.sitemap.priority.posts = Some(Setting::Number(0.8));
        config.sitemap.frequency.pages = Some(Setting::from("yearly"));
        let fixture = Fixture::new(config);
        let post = post(Metadata::new());

        let (entry, _, _) = fixture.build(Item::Post(&post), LatestDate::new());

        assert_eq!(entry.changefreq, Some(ChangeFreq::Weekly));
        assert_eq!(entry.priority.map(Priority::value), Some(0.8));
    }

    #[test]
    fn test_item_value_overrides_default() {
        let mut config = site();
        config.sitemap.priority.posts = Some(Setting::Number(0.8));
        let fixture = Fixture::new(config);
        let post = post(Metadata::new().with("priority", 0.2));

        let (entry, _, _) = fixture.build(Item::Post(&post), LatestDate::new());

        assert_eq!(entry.priority.map(Priority::value), Some(0.2));
    }

    #[test]
    fn test_collection_values_do_not_fall_back_to_defaults() {
        let mut config = site();
        config.sitemap.priority.pages = Some(Setting::Number(0.3));
        config.sitemap.frequency.pages = Some(Setting::from("yearly"));
        let fixture = Fixture::new(config);
        let metadata = Metadata::from_yaml_str("priority: [0.5]\nchange_frequency: {a: b}\n").unwrap();
        let page = missing_page("about.html", metadata);

        let (entry, _, diagnostics) = fixture.build(Item::Page(&page), LatestDate::new());

        assert_eq!(entry.priority, None);
        assert_eq!(entry.changefreq, None);
        let kinds: Vec<_> = diagnostics.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::InvalidFrequency, WarningKind::InvalidPriority]);
        assert!(diagnostics.warnings().iter().all(|w| w.item == "/about.html"));
    }

    #[test]
    fn test_invalid_default_warns_about_configuration() {
        let mut config = site();
        config.sitemap.frequency.index = Some(Setting::from("sometimes"));
        let fixture = Fixture::new(config);
        let index = missing_page("index.html", Metadata::new());

        let (entry, _, diagnostics) = fixture.build(Item::Index(&index), LatestDate::new());

        assert_eq!(entry.changefreq, None);
        assert_eq!(diagnostics.warnings()[0].item, "configuration (index)");
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::InvalidFrequency);
    }

    #[test]
    fn test_custom_metadata_keys() {
        let mut config = site();
        config.sitemap.change_frequency_name = "freq".to_string();
        config.sitemap.priority_name = "prio".to_string();
        let fixture = Fixture::new(config);
        let post = post(
            Metadata::new()
                .with("freq", "never")
                .with("prio", "1")
                .with("change_frequency", "bogus"),
        );

        let (entry, _, diagnostics) = fixture.build(Item::Post(&post), LatestDate::new());

        assert_eq!(entry.changefreq, Some(ChangeFreq::Never));
        assert_eq!(entry.priority.map(|p| p.to_string()), Some("1.0".to_string()));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_index_entry_takes_latest_and_leaves_it_unchanged() {
        let fixture = Fixture::new(site());
        let index = missing_page("index.html", Metadata::new());
        let latest = LatestDate::new()
            .observe(ts("2021-01-01"))
            .observe(ts("2022-06-15"));

        let (entry, after, _) = fixture.build(Item::Index(&index), latest);

        assert_eq!(entry.loc, "https://example.com/");
        assert_eq!(entry.lastmod, Some(ts("2022-06-15")));
        assert_eq!(after, latest);
    }

    #[test]
    fn test_index_entry_without_any_date() {
        let fixture = Fixture::new(site());
        let index = missing_page("index.html", Metadata::new());

        let (entry, _, _) = fixture.build(Item::Index(&index), LatestDate::new());

        assert_eq!(entry.lastmod, None);
    }
}
