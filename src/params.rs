//! URL parameter merge
//!
//! Every control that rewrites the page URL goes through [`NavigationParams`]
//! so that it only touches its own keys. Untouched parameters keep their raw
//! encoding and their position in the query string.

use crate::types::PageReset;
use url::{form_urlencoded, Url};

pub const SEARCH_KEY: &str = "search";
pub const PAGE_KEY: &str = "page";
pub const FIRST_PAGE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    key: String,
    value: String,
    raw: String,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        let (key, value) = form_urlencoded::parse(raw.as_bytes())
            .next()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .unwrap_or_default();
        Self {
            key,
            value,
            raw: raw.to_string(),
        }
    }

    fn encode(key: &str, value: &str) -> Self {
        let raw = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        Self {
            key: key.to_string(),
            value: value.to_string(),
            raw,
        }
    }
}

/// Ordered query parameters of a page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    segments: Vec<Segment>,
}

impl NavigationParams {
    pub fn parse(query: &str) -> Self {
        let segments = query
            .split('&')
            .filter(|raw| !raw.is_empty())
            .map(Segment::parse)
            .collect();
        Self { segments }
    }

    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or(""))
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|segment| segment.key == key)
            .map(|segment| segment.value.as_str())
    }

    /// Replace the first `key` in place and drop any later duplicates;
    /// append when the key is absent.
    pub fn set(&mut self, key: &str, value: &str) {
        let replacement = Segment::encode(key, value);
        match self.segments.iter().position(|segment| segment.key == key) {
            Some(first) => {
                self.segments[first] = replacement;
                let mut index = 0;
                self.segments.retain(|segment| {
                    let keep = index <= first || segment.key != key;
                    index += 1;
                    keep
                });
            }
            None => self.segments.push(replacement),
        }
    }

    /// Remove every occurrence of `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.segments.len();
        self.segments.retain(|segment| segment.key != key);
        self.segments.len() != before
    }

    pub fn reset_page(&mut self, policy: PageReset) {
        match policy {
            PageReset::Remove => {
                self.delete(PAGE_KEY);
            }
            PageReset::First => self.set(PAGE_KEY, FIRST_PAGE),
            PageReset::Keep => {}
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments
            .iter()
            .map(|segment| (segment.key.as_str(), segment.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.raw.as_str())
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Write these parameters back into `url`, dropping the `?` when empty.
    pub fn apply_to(&self, url: &mut Url) {
        if self.segments.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.to_query_string()));
        }
    }

    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        self.apply_to(&mut url);
        url
    }
}

pub fn set_param(url: &Url, key: &str, value: &str) -> Url {
    let mut params = NavigationParams::from_url(url);
    params.set(key, value);
    params.to_url(url)
}

pub fn delete_param(url: &Url, key: &str) -> Url {
    let mut params = NavigationParams::from_url(url);
    params.delete(key);
    params.to_url(url)
}
