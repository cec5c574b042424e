//! Site and sitemap configuration.
//!
//! Every sitemap option is optional; a missing key silently takes its
//! hard-coded default through serde.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute site URL (e.g., "https://example.com").
    pub url: String,

    /// Path prefix the site is served under (e.g., "/blog").
    #[serde(default)]
    pub baseurl: String,

    /// Pages whose source path starts with this prefix are located by their
    /// source path instead of their rendered URL.
    #[serde(default)]
    pub category_path: Option<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory the sitemap is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// Sitemap configuration, the `[sitemap]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Output file name relative to the output directory.
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Glob patterns of item paths left out of the sitemap.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Glob patterns of page paths treated as index pages.
    #[serde(default = "default_include_posts")]
    pub include_posts: Vec<String>,

    /// Metadata key holding an explicit last-modified date.
    #[serde(default = "default_lastmod_name")]
    pub lastmod_name: String,

    /// Metadata key holding a change frequency override.
    #[serde(default = "default_change_frequency_name")]
    pub change_frequency_name: String,

    /// Metadata key holding a priority override.
    #[serde(default = "default_priority_name")]
    pub priority_name: String,

    /// File name stripped from page URLs to produce directory URLs.
    #[serde(default = "default_document")]
    pub default_document: String,

    /// Default change frequency per category.
    #[serde(default)]
    pub frequency: CategoryDefaults,

    /// Default priority per category.
    #[serde(default)]
    pub priority: CategoryDefaults,
}

/// Per-category defaults for a single sitemap field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDefaults {
    /// Default for posts.
    #[serde(default)]
    pub posts: Option<Setting>,

    /// Default for ordinary pages.
    #[serde(default)]
    pub pages: Option<Setting>,

    /// Default for index pages.
    #[serde(default)]
    pub index: Option<Setting>,
}

/// A scalar configuration value that may be written as a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Number(f64),
    Text(String),
}

impl Setting {
    /// Textual form of the value, as it would appear in front matter.
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Setting {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// Default value functions
fn default_output_dir() -> String {
    "_site".to_string()
}

fn default_filename() -> String {
    "/sitemap.xml".to_string()
}

fn default_exclude() -> Vec<String> {
    vec![
        "/atom.xml".to_string(),
        "/feed.xml".to_string(),
        "/feed/index.xml".to_string(),
    ]
}

fn default_include_posts() -> Vec<String> {
    vec!["/index.html".to_string()]
}

fn default_lastmod_name() -> String {
    "lastmod".to_string()
}

fn default_change_frequency_name() -> String {
    "change_frequency".to_string()
}

fn default_priority_name() -> String {
    "priority".to_string()
}

fn default_document() -> String {
    "index.html".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            exclude: default_exclude(),
            include_posts: default_include_posts(),
            lastmod_name: default_lastmod_name(),
            change_frequency_name: default_change_frequency_name(),
            priority_name: default_priority_name(),
            default_document: default_document(),
            frequency: CategoryDefaults::default(),
            priority: CategoryDefaults::default(),
        }
    }
}

impl Config {
    /// Configuration for a site at `url` with every other option defaulted.
    pub fn for_site(url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                url: url.into(),
                baseurl: String::new(),
                category_path: None,
            },
            build: BuildConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `SITEMAPPER__*` environment overrides layered on top.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SITEMAPPER").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }

        let parsed = url::Url::parse(&self.site.url).map_err(|e| {
            CoreError::config_with_source(format!("site.url is not absolute: {}", self.site.url), e)
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CoreError::config(format!(
                "site.url cannot be used as a base: {}",
                self.site.url
            )));
        }

        if self.site.url.ends_with('/') {
            tracing::warn!("site.url should not have a trailing slash");
        }

        if self.sitemap.filename.trim_matches('/').is_empty() {
            return Err(CoreError::config("sitemap.filename cannot be empty"));
        }

        Ok(())
    }

    /// Site URL joined with the base path; every location starts with this.
    pub fn base_url(&self) -> String {
        format!("{}{}", self.site.url, self.site.baseurl)
    }
}
