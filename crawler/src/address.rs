//! Normalized URL value used as the crawl's deduplication key.
//!
//! Mirrors the normalization historically applied by this crawl engine: an
//! empty path is rewritten to `"/"` (per RFC 1945, a request line always
//! needs a path) and the fragment is always dropped, since fragments never
//! affect what a server returns.

use serde::{Deserialize, Serialize};
use url::Url;

/// A normalized absolute URL. `full` is the canonical equality/hash key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub full: String,
    pub scheme: String,
    pub opaque: String,
    pub host: String,
    pub path: String,
    pub query: String,
}

impl Address {
    /// Parses an absolute URL string into a normalized `Address`.
    pub fn parse(raw: &str) -> Option<Address> {
        let url = Url::parse(raw).ok()?;
        Some(Address::from_url(url))
    }

    /// Resolves `href` against `base`, the way an `<a href>` or `Location`
    /// header is resolved relative to the page that contained it.
    pub fn resolve(base: &Address, href: &str) -> Option<Address> {
        let base_url = Url::parse(&base.full).ok()?;
        let resolved = base_url.join(href).ok()?;
        Some(Address::from_url(resolved))
    }

    /// The robots-authorization key for this address: `path?query`, with
    /// the `?` retained even when the query is empty.
    pub fn path_and_query(&self) -> String {
        format!("{}?{}", self.path, self.query)
    }

    pub(crate) fn from_url(mut url: Url) -> Address {
        if url.path().is_empty() {
            url.set_path("/");
        }
        url.set_fragment(None);
        Address {
            full: url.to_string(),
            scheme: url.scheme().to_string(),
            opaque: if url.cannot_be_a_base() {
                url.path().to_string()
            } else {
                String::new()
            },
            host: url.host_str().unwrap_or_default().to_string(),
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_becomes_root() {
        let a = Address::parse("https://example.com").unwrap();
        assert_eq!(a.path, "/");
        assert_eq!(a.full, "https://example.com/");
    }

    #[test]
    fn fragment_is_cleared() {
        let a = Address::parse("https://example.com/page#section").unwrap();
        assert_eq!(a.full, "https://example.com/page");
    }

    #[test]
    fn query_is_preserved_raw() {
        let a = Address::parse("https://example.com/page?a=1&b=2").unwrap();
        assert_eq!(a.query, "a=1&b=2");
        assert_eq!(a.path_and_query(), "/page?a=1&b=2");
    }

    #[test]
    fn parse_is_idempotent() {
        let a = Address::parse("https://example.com/a/b?x=1#f").unwrap();
        let b = Address::parse(&a.full).unwrap();
        assert_eq!(a.full, b.full);
    }

    #[test]
    fn resolve_empty_href_returns_base() {
        let base = Address::parse("https://example.com/a/b").unwrap();
        let resolved = Address::resolve(&base, "").unwrap();
        assert_eq!(resolved.full, base.full);
    }

    #[test]
    fn resolve_relative_href() {
        let base = Address::parse("https://example.com/a/b").unwrap();
        let resolved = Address::resolve(&base, "../c").unwrap();
        assert_eq!(resolved.full, "https://example.com/c");
    }

    #[test]
    fn resolve_absolute_href_ignores_base() {
        let base = Address::parse("https://example.com/a/b").unwrap();
        let resolved = Address::resolve(&base, "https://other.com/x").unwrap();
        assert_eq!(resolved.full, Address::parse("https://other.com/x").unwrap().full);
    }

    #[test]
    fn unparseable_href_returns_none() {
        let base = Address::parse("https://example.com/a").unwrap();
        assert!(Address::resolve(&base, "http://[::bad").is_none());
    }
}
