//! Blog configuration (blog.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::content::{AssetLocation, RenderOptions};

/// Errors raised while loading `blog.yml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Base URL of the raw content host
    pub raw_base: String,
    pub repo: RepoConfig,
    pub blog: BlogSection,
    pub cache: CacheConfig,
    pub render: RenderConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            raw_base: "https://raw.githubusercontent.com".to_string(),
            repo: RepoConfig::default(),
            blog: BlogSection::default(),
            cache: CacheConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: BlogConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Where relative post assets live on the content host
    pub fn asset_location(&self) -> AssetLocation {
        AssetLocation {
            base: self.raw_base.clone(),
            owner: self.repo.owner.clone(),
            repo: self.repo.name.clone(),
            branch: self.repo.branch.clone(),
        }
    }

    /// Build the immutable renderer configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            assets: self.asset_location(),
            gfm: self.render.gfm,
            breaks: self.render.breaks,
        }
    }
}

/// Repository hosting the `blog-data` tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: "ranjithprabhuk".to_string(),
            name: "blog".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Blog-level display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogSection {
    pub title: String,
    pub description: String,
}

impl Default for BlogSection {
    fn default() -> Self {
        Self {
            title: "Ranjith's Blog".to_string(),
            description: "Thoughts on web development, software engineering, and modern tech"
                .to_string(),
        }
    }
}

/// Cache lifetimes, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of `metadata.json` and `index.json`
    pub metadata_ttl: u64,
    /// Lifetime of individual post bodies
    pub post_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            metadata_ttl: 5 * 60 * 1000,
            post_ttl: 30 * 60 * 1000,
        }
    }
}

impl CacheConfig {
    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_millis(self.metadata_ttl)
    }

    pub fn post_ttl(&self) -> Duration {
        Duration::from_millis(self.post_ttl)
    }
}

/// Markdown rendering switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub gfm: bool,
    pub breaks: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.raw_base, "https://raw.githubusercontent.com");
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.cache.metadata_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.post_ttl(), Duration::from_secs(1800));
        assert!(config.render.gfm);
        assert!(!config.render.breaks);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
repo:
  owner: someone
  name: notes
cache:
  post_ttl: 1000
render:
  breaks: true
"#;
        let config = BlogConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.repo.owner, "someone");
        assert_eq!(config.repo.name, "notes");
        // Unset fields keep their defaults
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.cache.post_ttl, 1000);
        assert_eq!(config.cache.metadata_ttl, 300_000);
        assert!(config.render.breaks);
        assert!(config.render.gfm);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = BlogConfig::from_yaml("\n").unwrap();
        assert_eq!(config.blog.title, "Ranjith's Blog");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            BlogConfig::from_yaml("repo: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_render_options() {
        let options = BlogConfig::default().render_options();
        assert_eq!(options.assets.owner, "ranjithprabhuk");
        assert_eq!(options.assets.repo, "blog");
        assert!(options.gfm);
    }
}
