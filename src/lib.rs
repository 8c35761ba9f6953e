//! blog-pipeline: the content pipeline of a markdown blog
//!
//! Turns raw post documents into display-ready data: front-matter is
//! extracted and normalized, the body is rendered to HTML with heading
//! anchors, rewritten asset URLs and copyable code blocks, and the result
//! is sanitized. Remote reads go through a TTL cache.

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};

use cache::FileStorage;
use client::{BlogClient, LocalFetcher};

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "blog.yml";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Local checkout of the blog data tree
    pub data_dir: PathBuf,
    /// Directory backing the cache
    pub cache_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        Self::with_dirs(base_dir, "blog-data", ".blog-cache")
    }

    /// Create a Blog instance with explicit data and cache directories,
    /// relative to `base_dir` unless absolute
    pub fn with_dirs<P, D, C>(base_dir: P, data_dir: D, cache_dir: C) -> Result<Self>
    where
        P: AsRef<Path>,
        D: AsRef<Path>,
        C: AsRef<Path>,
    {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        let data_dir = base_dir.join(data_dir);
        let cache_dir = base_dir.join(cache_dir);

        Ok(Self {
            config,
            base_dir,
            data_dir,
            cache_dir,
        })
    }

    /// The cache-gated client over the local data tree
    pub fn client(&self) -> BlogClient<LocalFetcher, FileStorage> {
        BlogClient::new(
            self.config.clone(),
            LocalFetcher::new(&self.data_dir),
            FileStorage::new(&self.cache_dir),
        )
    }

    /// Parse one post document
    pub fn parse(&self, raw: &str, folder: &str, post_id: &str) -> Result<content::ParsedPost> {
        let pipeline = content::PostPipeline::new(self.config.render_options());
        Ok(pipeline.parse(raw, folder, post_id)?)
    }

    /// Clear the cache
    pub fn clean(&self) -> Result<usize> {
        commands::clean::run(self)
    }
}
