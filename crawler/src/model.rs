//! The crawl's data model: the records produced per page and the queue
//! entries the scheduler shuffles between levels.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A single `<a>` reference discovered on a page, or a synthetic link
/// standing in for a redirect's `Location` target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Resolved target, absent if `href` could not be parsed.
    pub address: Option<Address>,
    pub href: String,
    pub anchor: String,
    pub nofollow: bool,
}

/// A page's declared canonical URL, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canonical {
    pub address: Option<Address>,
    pub href: String,
}

/// One `<link rel=alternate hreflang=...>` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hreflang {
    pub address: Option<Address>,
    pub href: String,
    pub hreflang: String,
}

/// One response header, repeated once per header name (first value only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

/// The record emitted for one crawled URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Result {
    pub address: Address,
    pub depth: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text_hash: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub h1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub robots: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<Canonical>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hreflang: Vec<Hreflang>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto_major: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto_minor: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<Pair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolves_to: Option<Address>,
}

impl Result {
    /// The bare, not-yet-hydrated record for `address` at `depth`. Used both
    /// as the base that `extractor::hydrate` fills in and for the synthetic
    /// "Blocked by robots.txt" record, which never gets hydrated further.
    pub fn bare(address: Address, depth: usize) -> Result {
        Result {
            address,
            depth,
            body_text_hash: None,
            title: String::new(),
            h1: String::new(),
            description: String::new(),
            robots: String::new(),
            canonical: None,
            links: Vec::new(),
            hreflang: Vec::new(),
            status: String::new(),
            status_code: None,
            proto: None,
            proto_major: None,
            proto_minor: None,
            header: Vec::new(),
            resolves_to: None,
        }
    }

    pub fn blocked_by_robots(address: Address, depth: usize) -> Result {
        let mut r = Result::bare(address, depth);
        r.status = "Blocked by robots.txt".to_string();
        r
    }
}

/// One entry in the scheduler's current or next-level queue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub address: Address,
    pub depth: usize,
}
