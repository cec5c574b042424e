//! sitemapper core library
//!
//! Configuration, the content model handed to the sitemap engine, and error handling.

pub mod config;
pub mod content;
pub mod error;
pub mod metadata;

pub use config::{CategoryDefaults, Config, Setting, SitemapConfig};
pub use content::{Layout, Page, Post, SiteContent};
pub use error::{CoreError, Result};
pub use metadata::{Metadata, Timestamp};
