//! Clear the cache

use anyhow::Result;

use crate::cache::{CacheStore, FileStorage};
use crate::Blog;

/// Remove every cache entry, returning how many were deleted
pub fn run(blog: &Blog) -> Result<usize> {
    if !blog.cache_dir.exists() {
        tracing::info!("No cache at {:?}", blog.cache_dir);
        return Ok(0);
    }

    let mut cache = CacheStore::new(FileStorage::new(&blog.cache_dir));
    let removed = cache.clear();
    tracing::info!("Deleted {} cache entries from {:?}", removed, blog.cache_dir);

    Ok(removed)
}
