//! Site metadata and post index models
//!
//! These mirror `metadata.json` and `index.json` as written by the index
//! generator. Lookups here serve presentation code; the post pipeline never
//! consults the index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Contents of `metadata.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogMetadata {
    pub version: String,
    pub blog: BlogInfo,
    pub author: AuthorInfo,
    pub categories: Vec<String>,
    pub repo: RepoInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogInfo {
    pub title: String,
    pub description: String,
    pub url: String,
    pub posts_per_page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorInfo {
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub social: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: String,
    pub twitter: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

/// One post as listed in `index.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    pub updated: String,
    pub category: String,
    pub tags: Vec<String>,
    pub reading_time: u32,
    /// Top-level folder holding the post, e.g. `blogs-2024`
    pub folder: String,
    /// Post directory inside the folder, e.g. `post-03`
    pub post_id: String,
    pub featured_image: String,
}

/// Contents of `index.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogIndex {
    pub version: String,
    pub total_posts: usize,
    pub last_updated: String,
    /// Newest first
    pub posts: Vec<PostSummary>,
    pub categories: IndexMap<String, usize>,
    pub tags: IndexMap<String, usize>,
}

impl BlogIndex {
    /// Find a post by slug
    pub fn find(&self, slug: &str) -> Option<&PostSummary> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Get the posts listed before and after `slug`
    pub fn neighbors(&self, slug: &str) -> (Option<&PostSummary>, Option<&PostSummary>) {
        let Some(pos) = self.posts.iter().position(|p| p.slug == slug) else {
            return (None, None);
        };
        let prev = pos.checked_sub(1).and_then(|i| self.posts.get(i));
        let next = self.posts.get(pos + 1);
        (prev, next)
    }

    /// The first `limit` posts other than `slug`
    pub fn recent_excluding(&self, slug: &str, limit: usize) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|p| p.slug != slug)
            .take(limit)
            .collect()
    }

    /// Posts filed under a category
    pub fn in_category(&self, category: &str) -> Vec<&PostSummary> {
        self.posts.iter().filter(|p| p.category == category).collect()
    }

    /// Posts carrying a tag
    pub fn with_tag(&self, tag: &str) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }
}
