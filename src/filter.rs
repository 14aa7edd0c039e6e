//! Filter engine: AND-combined predicates over the in-memory listings.

use crate::dataset::Listing;

/// Typed filter with every default spelled out.
///
/// All bounds are inclusive. Categorical fields only apply when set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub min_beds: i64,
    pub min_baths: i64,
    pub listing_type: Option<String>,
    pub home_type: Option<String>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lng: -180.0,
            max_lng: 180.0,
            min_price: 0.0,
            max_price: f64::INFINITY,
            min_beds: 0,
            min_baths: 0,
            listing_type: None,
            home_type: None,
        }
    }
}

impl FilterSpec {
    pub fn matches(&self, h: &Listing) -> bool {
        // Geographic box first; it rejects most listings on a map view.
        if h.lat < self.min_lat || h.lat > self.max_lat || h.lon < self.min_lng || h.lon > self.max_lng {
            return false;
        }

        if h.latest_price < self.min_price || h.latest_price > self.max_price {
            return false;
        }

        if i64::from(h.beds) < self.min_beds || i64::from(h.baths) < self.min_baths {
            return false;
        }

        if let Some(t) = &self.listing_type {
            if h.listing_type != *t {
                return false;
            }
        }

        if let Some(t) = &self.home_type {
            if h.home_type != *t {
                return false;
            }
        }

        true
    }

    /// Matching listings in dataset order.
    pub fn filter<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|h| self.matches(h)).collect()
    }
}
