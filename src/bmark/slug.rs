//! Stable IDs and filesystem-safe slugs.
//!
//! A bookmark's identity is a short hash of its normalized URL, so renaming
//! or moving the file never changes the ID. Slugs are the human-readable
//! part of the filename and carry no identity at all.

use sha2::{Digest, Sha256};
use url::Url;

/// Length of the hex-truncated ID digest.
pub const ID_LEN: usize = 8;

/// File extension for record files, including the dot.
pub const FILE_EXT: &str = ".bm";

/// Normalize a URL for identity purposes.
///
/// `Url::parse` lowercases the scheme and host and drops default ports.
/// On top of that we strip a single trailing slash and lowercase the whole
/// string, so `https://Example.com/Post/` and `https://example.com/post`
/// derive the same ID. Unparseable input falls back to the trimmed,
/// lowercased raw string so legacy records still get stable IDs.
pub fn normalize_url(url: &str) -> String {
    let raw = url.trim();
    let serialized = match Url::parse(raw) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => raw.to_string(),
    };
    let trimmed = serialized.strip_suffix('/').unwrap_or(&serialized);
    trimmed.to_lowercase()
}

/// Derive the stable short ID for a URL.
///
/// Deterministic: the same normalized URL always yields the same ID,
/// independent of title, tags, or where the file lives.
pub fn derive_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    let digest = hasher.finalize();
    let hex = format!("{:x}", digest);
    hex[..ID_LEN].to_string()
}

/// Reduce arbitrary text to a single filesystem- and URL-safe segment.
///
/// Lowercases, collapses every run of non-alphanumeric characters into one
/// `-`, and strips leading/trailing separators. Disallowed characters are
/// removed rather than replaced, so `".."` and control characters cannot
/// survive. May return an empty string; callers fall back.
pub fn normalize_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Derive a readable slug from a URL: `www.`-less host plus the last path
/// segment, e.g. `https://blog.example.com/posts/rust-tips` becomes
/// `blog-example-com-rust-tips`.
pub fn slug_from_url(url: &str) -> String {
    let parsed = match Url::parse(url.trim()) {
        Ok(p) => p,
        Err(_) => return normalize_slug(url),
    };
    let host = parsed
        .host_str()
        .map(|h| h.trim_start_matches("www."))
        .unwrap_or("link");
    let last = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or("");
    let base = if last.is_empty() {
        normalize_slug(host)
    } else {
        normalize_slug(&format!("{} {}", host, last))
    };
    if base.is_empty() {
        "link".to_string()
    } else {
        base
    }
}

/// Compose the on-disk filename: `<slug>-<id>.bm`. An empty slug falls
/// back to `link` so the filename never starts with the separator.
pub fn compose_filename(slug: &str, id: &str) -> String {
    let slug = if slug.is_empty() { "link" } else { slug };
    format!("{}-{}{}", slug, id, FILE_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_ignores_scheme_and_host_case() {
        assert_eq!(
            derive_id("https://Example.com/post"),
            derive_id("HTTPS://example.COM/post")
        );
    }

    #[test]
    fn id_ignores_trailing_slash() {
        assert_eq!(derive_id("http://x.test"), derive_id("http://x.test/"));
        assert_eq!(
            derive_id("https://example.com/post/"),
            derive_id("https://example.com/post")
        );
    }

    #[test]
    fn id_ignores_default_port() {
        assert_eq!(
            derive_id("https://example.com:443/a"),
            derive_id("https://example.com/a")
        );
    }

    #[test]
    fn id_is_fixed_width_hex() {
        let id = derive_id("https://example.com");
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_differ_for_different_urls() {
        assert_ne!(derive_id("https://a.test"), derive_id("https://b.test"));
    }

    #[test]
    fn slug_strips_and_collapses() {
        assert_eq!(normalize_slug("Hello, World!"), "hello-world");
        assert_eq!(normalize_slug("---dashes---"), "dashes");
        assert_eq!(normalize_slug("a  b\tc"), "a-b-c");
    }

    #[test]
    fn slug_never_keeps_separators_at_edges() {
        for input in ["!leading", "trailing?", "..", "/x/", "\u{7}bell\u{7}"] {
            let slug = normalize_slug(input);
            assert!(!slug.starts_with('-'), "{:?} -> {:?}", input, slug);
            assert!(!slug.ends_with('-'), "{:?} -> {:?}", input, slug);
            assert!(!slug.contains(".."));
            assert!(!slug.contains('/'));
        }
    }

    #[test]
    fn slug_from_url_uses_host_and_last_segment() {
        assert_eq!(
            slug_from_url("https://blog.example.com/posts/rust-tips"),
            "blog-example-com-rust-tips"
        );
        assert_eq!(slug_from_url("https://www.example.com/"), "example-com");
    }

    #[test]
    fn filename_falls_back_when_slug_is_empty() {
        assert_eq!(compose_filename("", "a1b2c3d4"), "link-a1b2c3d4.bm");
        assert_eq!(compose_filename("post", "a1b2c3d4"), "post-a1b2c3d4.bm");
    }
}
