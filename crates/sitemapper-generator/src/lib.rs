//! Sitemapper Generator Library
//!
//! Sitemap generation engine for sitemapper.
//!
//! # Modules
//!
//! - [`validate`] - Change frequency and priority value types
//! - [`filter`] - Exclusion and index-page glob matching
//! - [`dates`] - Last-modified date resolution and the site-wide latest date
//! - [`location`] - Absolute entry URLs
//! - [`entry`] - Per-item entry assembly
//! - [`sitemap`] - Document generation over a whole site
//! - [`xml`] - Sitemap XML serialization
//! - [`output`] - Atomic writes into the output tree
//! - [`build`] - Build orchestration

pub mod build;
pub mod dates;
pub mod diagnostics;
pub mod entry;
pub mod filter;
pub mod location;
pub mod output;
pub mod sitemap;
pub mod validate;
pub mod xml;

pub use build::{BuildError, BuildStats, Builder};
pub use dates::{DateResolver, LatestDate};
pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use entry::{Category, EntryBuilder, Item, SitemapEntry};
pub use filter::{Filter, PatternSet};
pub use location::UrlResolver;
pub use output::{KeepList, OutputError, OutputRegistry, write_atomic};
pub use sitemap::{Sitemap, SitemapError, SitemapGenerator};
pub use validate::{ChangeFreq, Priority, valid_frequency, valid_priority};
