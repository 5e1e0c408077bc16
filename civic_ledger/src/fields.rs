//! Lenient parsing of the numeric and date fields of a ledger.
//!
//! None of these functions fail loudly. The aggregators turn an `Err` into a
//! warning and a default value.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::Display;

/// A parser for one kind of field value.
pub type FieldParser<T> = fn(&str) -> Result<T, FieldError>;

/// The date layouts found in the exports, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FieldError {
    Missing,
    Invalid(String),
}

impl Error for FieldError {}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Missing => write!(f, "missing value"),
            FieldError::Invalid(s) => write!(f, "invalid value {:?}", s),
        }
    }
}

/// Parses a currency amount such as `$1,250.00`.
pub fn parse_amount(raw: &str) -> Result<f64, FieldError> {
    let clean: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let clean = clean.trim();
    if clean.is_empty() {
        return Err(FieldError::Missing);
    }
    match clean.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(FieldError::Invalid(raw.to_string())),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FieldError::Missing);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| FieldError::Invalid(raw.to_string()))
}

/// Parses a vote count. Thousands separators are accepted.
pub fn parse_votes(raw: &str) -> Result<u64, FieldError> {
    let clean: String = raw.chars().filter(|c| *c != ',').collect();
    let clean = clean.trim();
    if clean.is_empty() {
        return Err(FieldError::Missing);
    }
    clean
        .parse::<u64>()
        .map_err(|_| FieldError::Invalid(raw.to_string()))
}

pub fn parse_district(raw: &str) -> Result<u32, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FieldError::Missing);
    }
    s.parse::<u32>()
        .map_err(|_| FieldError::Invalid(raw.to_string()))
}
