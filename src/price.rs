//! # Price Records
//!
//! Listings carry their price history as text records of the form
//! `"DD/MM/YYYY | amount"`. This module decodes them into [`PriceRecord`]s
//! once, at load time, and resolves the most recent amount.
//!
//! - The separator may be `" | "` or a bare `"|"`; surrounding whitespace is ignored.
//! - Malformed dates or amounts are reported as [`PriceParseError`], never coerced.
//! - Among records sharing the latest date, the earliest-listed one wins.
//! - Serialization echoes the record text exactly as it was read.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// A single dated price observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub amount: f64,
    raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("price record '{0}' has no '|' separator")]
    MissingSeparator(String),
    #[error("price record '{record}' has an invalid date '{date}' (expected DD/MM/YYYY)")]
    InvalidDate { record: String, date: String },
    #[error("price record '{record}' has an invalid amount '{amount}'")]
    InvalidAmount { record: String, amount: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceResolveError {
    #[error("no price records to resolve")]
    Empty,
    #[error(transparent)]
    Parse(#[from] PriceParseError),
}

impl FromStr for PriceRecord {
    type Err = PriceParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (date_part, amount_part) = raw
            .split_once('|')
            .ok_or_else(|| PriceParseError::MissingSeparator(raw.to_string()))?;

        let date_part = date_part.trim();
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| {
            PriceParseError::InvalidDate {
                record: raw.to_string(),
                date: date_part.to_string(),
            }
        })?;

        let amount_part = amount_part.trim();
        let amount = amount_part
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| PriceParseError::InvalidAmount {
                record: raw.to_string(),
                amount: amount_part.to_string(),
            })?;

        Ok(Self {
            date,
            amount,
            raw: raw.to_string(),
        })
    }
}

impl PriceRecord {
    /// The record text as it appeared in the dataset.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.date.format(DATE_FORMAT), self.amount)
    }
}

impl Serialize for PriceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Amount of the chronologically latest record, or `None` when there are no records.
///
/// Comparison is strictly-greater, so ties keep the earliest-listed record.
pub fn latest_price(records: &[PriceRecord]) -> Option<f64> {
    let (first, rest) = records.split_first()?;
    let latest = rest
        .iter()
        .fold(first, |best, p| if p.date > best.date { p } else { best });
    Some(latest.amount)
}

/// Parse raw text records and resolve the latest amount.
pub fn resolve_latest<S: AsRef<str>>(raw: &[S]) -> Result<f64, PriceResolveError> {
    let records = raw
        .iter()
        .map(|s| s.as_ref().parse::<PriceRecord>())
        .collect::<Result<Vec<_>, _>>()?;
    latest_price(&records).ok_or(PriceResolveError::Empty)
}
