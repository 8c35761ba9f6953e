//! URL helper functions

use crate::content::AssetLocation;

/// Marker that identifies an image as a post-relative asset
pub const RELATIVE_ASSETS_PREFIX: &str = "./assets/";

/// Build the raw URL of a path inside the `blog-data` tree
///
/// # Examples
/// ```ignore
/// raw_url(&location, "index.json")
/// // -> "https://raw.githubusercontent.com/owner/repo/main/blog-data/index.json"
/// ```
pub fn raw_url(location: &AssetLocation, path: &str) -> String {
    format!(
        "{}/{}/{}/{}/blog-data/{}",
        location.base.trim_end_matches('/'),
        location.owner,
        location.repo,
        location.branch,
        path.trim_start_matches('/')
    )
}

/// Build the URL of a file in a post's `assets` directory
pub fn post_asset_url(location: &AssetLocation, folder: &str, post_id: &str, filename: &str) -> String {
    raw_url(location, &format!("{}/{}/assets/{}", folder, post_id, filename))
}

/// Rewrite an image source if it points at the post's relative assets
///
/// Anything that does not start with `./assets/` is returned unchanged.
pub fn resolve_image_src(location: &AssetLocation, folder: &str, post_id: &str, src: &str) -> String {
    match src.strip_prefix(RELATIVE_ASSETS_PREFIX) {
        Some(filename) => post_asset_url(location, folder, post_id, filename),
        None => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> AssetLocation {
        AssetLocation {
            base: "https://raw.githubusercontent.com/".to_string(),
            owner: "ranjithprabhuk".to_string(),
            repo: "blog".to_string(),
            branch: "main".to_string(),
        }
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(
            raw_url(&location(), "/metadata.json"),
            "https://raw.githubusercontent.com/ranjithprabhuk/blog/main/blog-data/metadata.json"
        );
    }

    #[test]
    fn test_resolve_relative_asset() {
        assert_eq!(
            resolve_image_src(&location(), "posts-2024", "post-03", "./assets/cover.png"),
            "https://raw.githubusercontent.com/ranjithprabhuk/blog/main/blog-data/posts-2024/post-03/assets/cover.png"
        );
    }

    #[test]
    fn test_resolve_passthrough() {
        let loc = location();
        assert_eq!(resolve_image_src(&loc, "f", "p", "https://x/y.png"), "https://x/y.png");
        assert_eq!(resolve_image_src(&loc, "f", "p", "assets/y.png"), "assets/y.png");
        assert_eq!(resolve_image_src(&loc, "f", "p", "../assets/y.png"), "../assets/y.png");
    }
}
