//! # Result Shaper
//!
//! Turns the filtered listings into the response envelope:
//! 1. optional zoom cap (sort by latest price, descending, then truncate),
//! 2. optional general `limit`, or a page window when `page` is given.
//!
//! `totalMatches` counts the set after the zoom cap and before the limit.

use serde::Serialize;

use crate::dataset::Listing;

/// Page size used when `page` is requested without a `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeSpec {
    pub zoom_level: Option<i64>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HousesResponse<'a> {
    pub count: usize,
    pub total_matches: usize,
    /// Normalized zoom: the parsed integer, `null` when missing or unparsable.
    pub zoom_level: Option<i64>,
    pub applied_zoom_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    pub data: Vec<&'a Listing>,
}

/// Maximum number of results for a map zoom level; `None` means uncapped.
pub fn zoom_limit(zoom: Option<i64>) -> Option<usize> {
    match zoom? {
        z if z <= 6 => Some(200),
        z if z <= 8 => Some(400),
        z if z <= 10 => None,
        z if z <= 12 => Some(900),
        _ => None,
    }
}

pub fn shape<'a>(mut matches: Vec<&'a Listing>, spec: &ShapeSpec) -> HousesResponse<'a> {
    let applied_zoom_limit = zoom_limit(spec.zoom_level);

    if let Some(cap) = applied_zoom_limit {
        // stable: equal prices keep dataset order
        matches.sort_by(|a, b| b.latest_price.total_cmp(&a.latest_price));
        matches.truncate(cap);
    }

    let total_matches = matches.len();

    let (data, page, total_pages) = match spec.page {
        None => {
            if let Some(limit) = spec.limit {
                matches.truncate(limit);
            }
            (matches, None, None)
        }
        Some(page) => {
            let size = spec.limit.unwrap_or(DEFAULT_PAGE_SIZE);
            let start = page.saturating_sub(1).saturating_mul(size);
            let window = matches.into_iter().skip(start).take(size).collect::<Vec<_>>();
            (window, Some(page), Some(total_matches.div_ceil(size)))
        }
    };

    HousesResponse {
        count: data.len(),
        total_matches,
        zoom_level: spec.zoom_level,
        applied_zoom_limit,
        page,
        total_pages,
        data,
    }
}
