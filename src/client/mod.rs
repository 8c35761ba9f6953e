//! Cache-gated access to the blog data tree
//!
//! [`BlogClient`] resolves site metadata, the post index and post bodies.
//! Each resource is looked up in the cache first; the [`Fetcher`] is only
//! called on a miss, and its result is cached for the configured TTL.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheKey, CacheStore, Clock, Storage, SystemClock};
use crate::config::BlogConfig;
use crate::content::{BlogIndex, BlogMetadata, FrontmatterError, ParsedPost, PostPipeline};
use crate::helpers::raw_url;

/// Errors raised while fetching a resource
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by [`BlogClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid JSON in {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

/// Retrieves raw text by its path inside the blog data tree
pub trait Fetcher {
    fn fetch_raw(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads from a local checkout of the blog data tree
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for LocalFetcher {
    fn fetch_raw(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        tracing::debug!("Reading {:?}", full);
        match fs::read_to_string(&full) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Data access for one blog
pub struct BlogClient<F, S, C = SystemClock> {
    config: BlogConfig,
    fetcher: F,
    cache: CacheStore<S, C>,
    pipeline: PostPipeline,
}

impl<F: Fetcher, S: Storage> BlogClient<F, S, SystemClock> {
    pub fn new(config: BlogConfig, fetcher: F, storage: S) -> Self {
        Self::with_cache(config, fetcher, CacheStore::new(storage))
    }
}

impl<F: Fetcher, S: Storage, C: Clock> BlogClient<F, S, C> {
    pub fn with_cache(config: BlogConfig, fetcher: F, cache: CacheStore<S, C>) -> Self {
        let pipeline = PostPipeline::new(config.render_options());
        Self {
            config,
            fetcher,
            cache,
            pipeline,
        }
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    /// Site metadata from `metadata.json`
    pub fn metadata(&mut self) -> Result<BlogMetadata, ClientError> {
        let ttl = self.config.cache.metadata_ttl();
        self.cached_json(CacheKey::Metadata, "metadata.json", ttl)
    }

    /// The post index from `index.json`
    pub fn index(&mut self) -> Result<BlogIndex, ClientError> {
        let ttl = self.config.cache.metadata_ttl();
        self.cached_json(CacheKey::Index, "index.json", ttl)
    }

    /// Raw text of `{folder}/{post_id}/post.md`
    pub fn post_content(&mut self, folder: &str, post_id: &str) -> Result<String, ClientError> {
        let key = CacheKey::post(folder, post_id);
        if let Some(raw) = self.cache.get::<String>(&key) {
            return Ok(raw);
        }

        let raw = self.fetcher.fetch_raw(&post_path(folder, post_id))?;
        self.cache.set(&key, &raw, self.config.cache.post_ttl());
        Ok(raw)
    }

    /// Fetch and parse a post
    pub fn load_post(&mut self, folder: &str, post_id: &str) -> Result<ParsedPost, ClientError> {
        let raw = self.post_content(folder, post_id)?;
        Ok(self.pipeline.parse(&raw, folder, post_id)?)
    }

    /// Public URL of any file in the blog data tree
    pub fn asset_url(&self, path: &str) -> String {
        raw_url(&self.config.asset_location(), path)
    }

    fn cached_json<T>(&mut self, key: CacheKey, path: &str, ttl: Duration) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(value) = self.cache.get::<T>(&key) {
            return Ok(value);
        }

        let raw = self.fetcher.fetch_raw(path)?;
        let value: T = serde_json::from_str(&raw).map_err(|source| ClientError::Decode {
            path: path.to_string(),
            source,
        })?;
        self.cache.set(&key, &value, ttl);
        Ok(value)
    }
}

/// Path of a post document inside the blog data tree
pub fn post_path(folder: &str, post_id: &str) -> String {
    format!("{}/{}/post.md", folder, post_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, MemoryStorage};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Serves fixed documents and records every request
    #[derive(Default)]
    struct CountingFetcher {
        files: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl CountingFetcher {
        fn with(mut self, path: &str, body: &str) -> Self {
            self.files.insert(path.to_string(), body.to_string());
            self
        }

        fn count(&self, path: &str) -> usize {
            self.requests.borrow().iter().filter(|p| *p == path).count()
        }
    }

    impl Fetcher for &CountingFetcher {
        fn fetch_raw(&self, path: &str) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(path.to_string());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(path.to_string()))
        }
    }

    const POST: &str = "---\ntitle: Cached\ndate: 2024-01-15\n---\n# Cached\n";

    fn fetcher() -> CountingFetcher {
        CountingFetcher::default()
            .with("metadata.json", r#"{"version": "1.0", "blog": {"title": "T"}}"#)
            .with(
                "index.json",
                r#"{"totalPosts": 1, "posts": [{"slug": "cached", "folder": "blogs-2024", "postId": "post-01"}]}"#,
            )
            .with("blogs-2024/post-01/post.md", POST)
            .with("blogs-2024/post-02/post.md", "---\ntitle: [oops\n---\n")
            .with("broken.json", "{")
    }

    fn client(
        fetcher: &CountingFetcher,
    ) -> (BlogClient<&CountingFetcher, MemoryStorage, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let cache = CacheStore::with_clock(MemoryStorage::new(), clock.clone());
        (BlogClient::with_cache(BlogConfig::default(), fetcher, cache), clock)
    }

    #[test]
    fn test_second_call_hits_cache() {
        let fetcher = fetcher();
        let (mut client, _) = client(&fetcher);

        let first = client.index().unwrap();
        let second = client.index().unwrap();
        assert_eq!(first, second);
        assert_eq!(second.posts[0].post_id, "post-01");
        assert_eq!(fetcher.count("index.json"), 1);

        client.metadata().unwrap();
        client.metadata().unwrap();
        assert_eq!(fetcher.count("metadata.json"), 1);
    }

    #[test]
    fn test_expired_entry_refetched() {
        let fetcher = fetcher();
        let (mut client, clock) = client(&fetcher);

        client.post_content("blogs-2024", "post-01").unwrap();
        clock.advance(Duration::from_secs(29 * 60));
        client.post_content("blogs-2024", "post-01").unwrap();
        assert_eq!(fetcher.count("blogs-2024/post-01/post.md"), 1);

        clock.advance(Duration::from_secs(2 * 60));
        client.post_content("blogs-2024", "post-01").unwrap();
        assert_eq!(fetcher.count("blogs-2024/post-01/post.md"), 2);
    }

    #[test]
    fn test_load_post() {
        let fetcher = fetcher();
        let (mut client, _) = client(&fetcher);

        let post = client.load_post("blogs-2024", "post-01").unwrap();
        assert_eq!(post.frontmatter.title, "Cached");
        assert_eq!(post.headings[0].id, "cached");

        let again = client.load_post("blogs-2024", "post-01").unwrap();
        assert_eq!(post, again);
        assert_eq!(fetcher.count("blogs-2024/post-01/post.md"), 1);
    }

    #[test]
    fn test_errors() {
        let fetcher = fetcher();
        let (mut client, _) = client(&fetcher);

        assert!(matches!(
            client.load_post("blogs-2024", "post-02"),
            Err(ClientError::Frontmatter(_))
        ));
        assert!(matches!(
            client.post_content("blogs-2024", "missing"),
            Err(ClientError::Fetch(FetchError::NotFound(_)))
        ));
        assert!(matches!(
            client.cached_json::<BlogIndex>(CacheKey::Index, "broken.json", Duration::from_secs(1)),
            Err(ClientError::Decode { .. })
        ));
        // Failures are not cached
        assert!(client.cache.get::<BlogIndex>(&CacheKey::Index).is_none());
    }

    #[test]
    fn test_asset_url() {
        let fetcher = fetcher();
        let (client, _) = client(&fetcher);
        assert_eq!(
            client.asset_url("blogs-2024/post-01/assets/a.png"),
            "https://raw.githubusercontent.com/ranjithprabhuk/blog/main/blog-data/blogs-2024/post-01/assets/a.png"
        );
    }

    #[test]
    fn test_local_fetcher() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blogs-2024/post-01")).unwrap();
        fs::write(tmp.path().join("blogs-2024/post-01/post.md"), POST).unwrap();

        let fetcher = LocalFetcher::new(tmp.path());
        assert_eq!(fetcher.fetch_raw("blogs-2024/post-01/post.md").unwrap(), POST);
        assert!(matches!(
            fetcher.fetch_raw("index.json"),
            Err(FetchError::NotFound(p)) if p == "index.json"
        ));
    }
}
