//! # Dataset
//!
//! Listings are read once at startup from a JSON array, validated, and turned
//! into an immutable [`Dataset`] with every listing's latest price already
//! derived. Requests only ever borrow from it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::price::{latest_price, PriceParseError, PriceRecord};

pub const DEFAULT_DATASET_PATH: &str = "data/houses.json";

/// Keys `Listing` writes itself; a file copy of any of them must not reach `extra`.
const OWNED_KEYS: [&str; 9] = [
    "id",
    "lat",
    "lon",
    "beds",
    "baths",
    "listingType",
    "homeType",
    "prices",
    "latestPrice",
];

/// A listing exactly as it appears in the dataset file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(default)]
    pub id: Option<Value>,
    pub lat: f64,
    pub lon: f64,
    pub beds: u32,
    pub baths: u32,
    pub listing_type: String,
    pub home_type: String,
    #[serde(default)]
    pub prices: Vec<String>,
    /// Anything else (address, images, ...) is carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated listing with decoded price history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub lat: f64,
    pub lon: f64,
    pub beds: u32,
    pub baths: u32,
    pub listing_type: String,
    pub home_type: String,
    pub prices: Vec<PriceRecord>,
    pub latest_price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("listing #{index} ({id}) does not match the listing shape: {source}")]
    Shape {
        index: usize,
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("listing #{index} ({id}) has no price records")]
    EmptyPrices { index: usize, id: String },
    #[error("listing #{index} ({id}): {source}")]
    BadPrice {
        index: usize,
        id: String,
        #[source]
        source: PriceParseError,
    },
}

impl Listing {
    /// Decode one element of the dataset array.
    pub fn from_value(index: usize, value: Value) -> Result<Self, DatasetError> {
        let id = display_id(value.get("id"));
        let raw = serde_json::from_value::<RawListing>(value)
            .map_err(|source| DatasetError::Shape { index, id, source })?;
        Self::from_raw(index, raw)
    }

    /// Decode a raw listing. `index` is its position in the file, used for diagnostics.
    pub fn from_raw(index: usize, raw: RawListing) -> Result<Self, DatasetError> {
        let id = display_id(raw.id.as_ref());

        let prices = raw
            .prices
            .iter()
            .map(|p| p.parse::<PriceRecord>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| DatasetError::BadPrice {
                index,
                id: id.clone(),
                source,
            })?;

        let latest_price =
            latest_price(&prices).ok_or(DatasetError::EmptyPrices { index, id })?;

        let mut extra = raw.extra;
        for key in OWNED_KEYS {
            extra.remove(key);
        }

        Ok(Self {
            id: raw.id,
            lat: raw.lat,
            lon: raw.lon,
            beds: raw.beds,
            baths: raw.baths,
            listing_type: raw.listing_type,
            home_type: raw.home_type,
            prices,
            latest_price,
            extra,
        })
    }
}

fn display_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => "no id".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: usize,
}

/// Immutable, process-lifetime listing collection.
#[derive(Debug, Default)]
pub struct Dataset {
    listings: Vec<Listing>,
}

impl Dataset {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Validate the elements of the dataset array one by one.
    ///
    /// With `strict`, the first invalid listing aborts the build; otherwise it is
    /// skipped with a warning and counted in the report.
    pub fn from_values(values: Vec<Value>, strict: bool) -> Result<(Self, LoadReport), DatasetError> {
        let mut listings = Vec::with_capacity(values.len());
        let mut report = LoadReport::default();

        for (index, v) in values.into_iter().enumerate() {
            match Listing::from_value(index, v) {
                Ok(l) => listings.push(l),
                Err(e) if strict => return Err(e),
                Err(e) => {
                    warn!(error = %e, "skipping invalid listing");
                    report.rejected += 1;
                }
            }
        }

        report.loaded = listings.len();
        Ok((Self { listings }, report))
    }

    pub fn from_json_str(s: &str, strict: bool) -> Result<(Self, LoadReport)> {
        let values: Vec<Value> = serde_json::from_str(s).context("parsing listings JSON")?;
        Ok(Self::from_values(values, strict)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P, strict: bool) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dataset from {}", path.display()))?;
        let (ds, report) = Self::from_json_str(&content, strict)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            rejected = report.rejected,
            "dataset loaded"
        );
        Ok(ds)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
