//! Hydrates a [`crate::model::Result`] from an HTTP response and, when the
//! response is HTML, its parsed DOM. This is the one component that feeds
//! back into the scheduler's queue: the links and the redirect target it
//! produces are what the merge step consumes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use scraper::Html;
use sha2::{Digest, Sha512};
use tracing::debug;

use crate::address::Address;
use crate::html_query;
use crate::model::{Canonical, Hreflang, Link, Pair, Result};

/// Builds a `Result` for `address` at `depth` from a live HTTP response.
///
/// Reads the response body when (and only when) `Content-Type` begins with
/// `text/html`; any other content type is recorded by status/header fields
/// alone, per this crawler's non-goal of handling non-HTML payloads.
pub async fn hydrate(address: &Address, depth: usize, resp: reqwest::Response) -> Result {
    let mut result = Result::bare(address.clone(), depth);

    result.status = resp.status().to_string();
    let status_code = resp.status().as_u16();
    result.status_code = Some(status_code);
    let (proto, major, minor) = proto_parts(resp.version());
    result.proto = Some(proto);
    result.proto_major = Some(major);
    result.proto_minor = Some(minor);

    let headers = resp.headers().clone();
    for name in headers.keys() {
        let value = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        result.header.push(Pair {
            key: name.as_str().to_string(),
            value: value.to_string(),
        });
    }

    result.resolves_to = Some(address.clone());
    if (300..400).contains(&status_code) {
        if let Some(loc) = headers.get(LOCATION).and_then(|v| v.to_str().ok()) {
            if let Some(target) = Address::resolve(address, loc) {
                result.resolves_to = Some(target.clone());
                result.links.push(Link {
                    address: Some(target),
                    href: loc.to_string(),
                    anchor: String::new(),
                    nofollow: false,
                });
            }
        }
    }

    let is_html = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));

    if is_html {
        match resp.text().await {
            Ok(body) => {
                let doc = Html::parse_document(&body);
                hydrate_html(&mut result, address, &doc);
            }
            Err(err) => {
                debug!(url = %address.full, error = %err, "failed to read HTML body");
            }
        }
    }

    result
}

fn hydrate_html(result: &mut Result, base: &Address, doc: &Html) {
    result.title = html_query::text(html_query::first("title", &[], doc));
    result.h1 = html_query::text(html_query::first("h1", &[], doc));
    result.description = html_query::attr(
        "content",
        html_query::first("meta", &[("name", "description")], doc),
    );
    result.robots = html_query::attr(
        "content",
        html_query::first("meta", &[("name", "robots")], doc),
    );

    let canonical_href = html_query::attr(
        "href",
        html_query::first("link", &[("rel", "canonical")], doc),
    );
    if !canonical_href.is_empty() {
        result.canonical = Some(Canonical {
            address: Address::resolve(base, &canonical_href),
            href: canonical_href,
        });
    }

    for node in html_query::all("link", &[("rel", "alternate")], doc) {
        let href = html_query::attr("href", Some(node));
        if href.is_empty() {
            continue;
        }
        let lang = html_query::attr("hreflang", Some(node));
        result.hreflang.push(Hreflang {
            address: Address::resolve(base, &href),
            href,
            hreflang: lang,
        });
    }

    for node in html_query::all("a", &[], doc) {
        let href = html_query::attr("href", Some(node));
        let anchor = html_query::text(Some(node));
        let nofollow = html_query::attr("rel", Some(node)) == "nofollow";
        result.links.push(Link {
            address: Address::resolve(base, &href),
            href,
            anchor,
            nofollow,
        });
    }

    let body_text = html_query::text(html_query::first("body", &[], doc));
    let digest = Sha512::digest(body_text.as_bytes());
    result.body_text_hash = Some(BASE64.encode(digest));
}

fn proto_parts(version: reqwest::Version) -> (String, u8, u8) {
    match version {
        reqwest::Version::HTTP_09 => ("HTTP/0.9".to_string(), 0, 9),
        reqwest::Version::HTTP_10 => ("HTTP/1.0".to_string(), 1, 0),
        reqwest::Version::HTTP_11 => ("HTTP/1.1".to_string(), 1, 1),
        reqwest::Version::HTTP_2 => ("HTTP/2.0".to_string(), 2, 0),
        reqwest::Version::HTTP_3 => ("HTTP/3.0".to_string(), 3, 0),
        _ => ("HTTP/1.1".to_string(), 1, 1),
    }
}
