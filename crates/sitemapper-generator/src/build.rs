//! Build orchestration.
//!
//! Runs one sitemap generation pass over collected site content and writes
//! the document into the output directory.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use sitemapper_core::{Config, SiteContent};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    diagnostics::Warning,
    output::{self, OutputError, OutputRegistry},
    sitemap::{SitemapError, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Output error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of `<url>` entries written.
    pub entries: usize,

    /// Recoverable problems reported during generation.
    pub warnings: Vec<Warning>,

    /// Written sitemap file.
    pub path: PathBuf,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Sitemap builder for one site.
#[derive(Debug)]
pub struct Builder {
    generator: SitemapGenerator,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a builder writing into the configured output directory.
    pub fn new(config: Config) -> Result<Self> {
        let output_dir = config.build.output_dir.clone();
        Self::with_output_dir(config, output_dir)
    }

    /// Create a builder writing into `output_dir`.
    pub fn with_output_dir(config: Config, output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            generator: SitemapGenerator::new(config)?,
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate the sitemap for `content`, write it, and record the written
    /// file with `registry`. Nothing is written if rendering fails.
    pub fn build(
        &self,
        content: &SiteContent,
        registry: &mut dyn OutputRegistry,
    ) -> Result<BuildStats> {
        let start = Instant::now();
        let filename = &self.generator.config().sitemap.filename;

        info!(
            output = %self.output_dir.display(),
            filename = %filename,
            "starting sitemap build"
        );

        let sitemap = self.generator.generate(content);
        let xml = self.generator.render(&sitemap)?;
        let path = output::write_atomic(&self.output_dir, filename, xml.as_bytes())?;
        registry.register(path.clone());

        let stats = BuildStats {
            entries: sitemap.entries.len(),
            warnings: sitemap.warnings,
            path,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if !stats.warnings.is_empty() {
            warn!(count = stats.warnings.len(), "sitemap built with warnings");
        }
        info!(
            entries = stats.entries,
            path = %stats.path.display(),
            duration_ms = stats.duration_ms,
            "sitemap build complete"
        );

        Ok(stats)
    }
}
