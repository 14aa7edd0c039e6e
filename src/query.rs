//! Query-string parsing for `/api/houses`.
//!
//! Every parameter arrives as optional text. Anything empty, unparsable or NaN
//! counts as "not provided" and falls back to the engine default, so a bad
//! query never turns into an error response.

use serde::Deserialize;

use crate::filter::FilterSpec;
use crate::shaper::ShapeSpec;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseQuery {
    pub min_lat: Option<String>,
    pub max_lat: Option<String>,
    pub min_lng: Option<String>,
    pub max_lng: Option<String>,
    pub listing_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub home_type: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    /// Long-form spellings of `beds`/`baths`; the short form wins when both are set.
    pub min_beds: Option<String>,
    pub min_baths: Option<String>,
    pub limit: Option<String>,
    pub zoom_level: Option<String>,
    pub page: Option<String>,
}

impl HouseQuery {
    pub fn filter_spec(&self) -> FilterSpec {
        let d = FilterSpec::default();
        FilterSpec {
            min_lat: parse_float(&self.min_lat).unwrap_or(d.min_lat),
            max_lat: parse_float(&self.max_lat).unwrap_or(d.max_lat),
            min_lng: parse_float(&self.min_lng).unwrap_or(d.min_lng),
            max_lng: parse_float(&self.max_lng).unwrap_or(d.max_lng),
            min_price: parse_float(&self.min_price).unwrap_or(d.min_price),
            max_price: parse_float(&self.max_price).unwrap_or(d.max_price),
            min_beds: parse_int(&self.beds)
                .or_else(|| parse_int(&self.min_beds))
                .unwrap_or(d.min_beds),
            min_baths: parse_int(&self.baths)
                .or_else(|| parse_int(&self.min_baths))
                .unwrap_or(d.min_baths),
            listing_type: non_empty(&self.listing_type),
            home_type: non_empty(&self.home_type),
        }
    }

    pub fn shape_spec(&self) -> ShapeSpec {
        ShapeSpec {
            zoom_level: parse_int(&self.zoom_level),
            limit: positive(&self.limit),
            page: positive(&self.page),
        }
    }
}

fn non_empty(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_float(raw: &Option<String>) -> Option<f64> {
    non_empty(raw)?.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Integer parse that also accepts decimals, truncating toward zero (`"3.7"` → 3).
pub(crate) fn parse_int(raw: &Option<String>) -> Option<i64> {
    let s = non_empty(raw)?;
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

fn positive(raw: &Option<String>) -> Option<usize> {
    parse_int(raw)
        .filter(|v| *v > 0)
        .and_then(|v| usize::try_from(v).ok())
}
