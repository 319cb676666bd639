//! Query-parameter mapping for listing requests.

use std::num::IntErrorKind;

use tracing::warn;
use url::form_urlencoded;

use super::types::{ListingConfig, PageRequest};

/// Query parameters of a listing request.
///
/// Keeps the order in which keys first appeared. When a key repeats, the
/// first value wins and later ones are discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    /// Parse a URL query string. A leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Build from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            if params.get(&key).is_none() {
                params.pairs.push((key, value.into()));
            }
        }
        params
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over parameters in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Same parameters with `page` replaced.
    ///
    /// `page` comes first, followed by every other parameter in its original
    /// order, so sort and filter state carries over between pages.
    pub fn with_page(&self, page: u32) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        pairs.push(("page".to_string(), page.to_string()));
        pairs.extend(self.pairs.iter().filter(|(k, _)| k != "page").cloned());
        Self { pairs }
    }

    /// Encode as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Resolve `page` and `limit`, falling back to defaults.
    ///
    /// Missing, non-integer and non-positive values use the defaults
    /// (page 1, `config.default_per_page`). A `limit` above
    /// `config.max_per_page` is capped. A `page` too large to represent is
    /// clamped to `u32::MAX`, which lies past the last page.
    pub fn page_request(&self, config: &ListingConfig) -> PageRequest {
        let page = self
            .positive_int("page")
            .map_or(1, |p| u32::try_from(p).unwrap_or(u32::MAX));
        let requested = self
            .positive_int("limit")
            .unwrap_or(u64::from(config.default_per_page.max(1)));

        let limit = match u32::try_from(requested) {
            Ok(limit) if limit <= config.max_per_page => limit,
            _ => {
                warn!(
                    requested,
                    capped = config.max_per_page,
                    "limit exceeds maximum, capping"
                );
                config.max_per_page.max(1)
            }
        };

        PageRequest { page, limit }
    }

    /// Positive integer value of `key`. Digit strings beyond `u64` saturate.
    fn positive_int(&self, key: &str) -> Option<u64> {
        let raw = self.get(key)?.trim();
        let value = match raw.parse::<u64>() {
            Ok(value) => value,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
            Err(_) => return None,
        };
        (value >= 1).then_some(value)
    }
}
