//! Catalog URL query codec.
//!
//! The query string is the only channel through which catalog navigation state travels, so
//! parsing and encoding are pure functions over [`QueryParams`]. Encoding is
//! `application/x-www-form-urlencoded` (space as `+`) with a fixed key order: `cat`, `sub`, `q`,
//! `step`.

use crate::constants::{CATALOG_PATH, QUERY_CATEGORY, QUERY_STEP, QUERY_SUBCATEGORY, QUERY_TEXT};
use serde::{Deserialize, Serialize};

/// Decoded catalog query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Selected category label.
    #[serde(default)]
    pub cat: Option<String>,
    /// Selected subcategory slug.
    #[serde(default)]
    pub sub: Option<String>,
    /// Free-text filter, carried through navigation untouched.
    #[serde(default)]
    pub q: Option<String>,
    /// Informational wizard step. Never used to re-derive state.
    #[serde(default)]
    pub step: Option<u8>,
}

impl QueryParams {
    /// Parse a raw query string, with or without the leading `?`.
    ///
    /// The first occurrence of a repeated key wins, empty values count as absent, and a `step`
    /// that is not one of 1, 2, 3 is ignored. Undecodable input yields empty params.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(raw) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring undecodable catalog query");
                return Self::default();
            }
        };

        let mut params = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_str() {
                QUERY_CATEGORY => &mut params.cat,
                QUERY_SUBCATEGORY => &mut params.sub,
                QUERY_TEXT => &mut params.q,
                QUERY_STEP => {
                    if params.step.is_none() {
                        params.step = value.parse::<u8>().ok().filter(|s| (1..=3).contains(s));
                    }
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Encode as a query string without the leading `?`. Absent values are omitted.
    pub fn to_query_string(&self) -> String {
        let step = self.step.map(|s| s.to_string());
        let pairs: Vec<(&str, &str)> = [
            (QUERY_CATEGORY, self.cat.as_deref()),
            (QUERY_SUBCATEGORY, self.sub.as_deref()),
            (QUERY_TEXT, self.q.as_deref()),
            (QUERY_STEP, step.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect();

        match serde_urlencoded::to_string(&pairs) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode catalog query");
                String::new()
            }
        }
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.cat.is_none() && self.sub.is_none() && self.q.is_none() && self.step.is_none()
    }

    /// True when any of `cat`, `sub` or `q` is set.
    pub fn has_selection_or_text(&self) -> bool {
        self.cat.is_some() || self.sub.is_some() || self.q.is_some()
    }
}

/// `/catalog`, followed by the encoded params when there are any.
pub fn listing_href(params: &QueryParams) -> String {
    with_query(CATALOG_PATH.to_owned(), params)
}

/// Detail page link. Carries `cat`, `sub` and `q`, never `step`.
pub fn procedure_href(slug: &str, params: &QueryParams) -> String {
    let carried = QueryParams {
        step: None,
        ..params.clone()
    };
    with_query(format!("{CATALOG_PATH}/{slug}"), &carried)
}

/// Link from a detail page back to the listing.
///
/// Appends `step=3` whenever any of `cat`, `sub` or `q` is present; otherwise it is the bare
/// listing URL.
pub fn back_href(params: &QueryParams) -> String {
    let back = QueryParams {
        step: params.has_selection_or_text().then_some(3),
        ..params.clone()
    };
    listing_href(&back)
}

fn with_query(path: String, params: &QueryParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    }
}
