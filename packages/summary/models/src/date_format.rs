//! `MM/DD/YYYY` date handling for court summary fields.
//!
//! Court summaries print every date as `01/31/2021`. Empty cells are common
//! and map to `None`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// The date format printed on court summary reports.
pub const FORMAT: &str = "%m/%d/%Y";

/// Parses a report date, returning `None` for empty or unparseable text.
///
/// Unparseable non-empty text is logged since it usually means a column
/// was misassigned.
#[must_use]
pub fn parse(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(text, FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Ignoring unparseable date '{text}': {e}");
            None
        }
    }
}

/// Serde adapter for `Option<NaiveDate>` fields, used with
/// `#[serde(with = "date_format")]`.
///
/// # Errors
///
/// Serialization never fails for valid dates.
#[allow(clippy::ref_option)]
pub fn serialize<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.collect_str(&date.format(FORMAT)),
        None => serializer.serialize_none(),
    }
}

/// Deserializes an optional `MM/DD/YYYY` string.
///
/// # Errors
///
/// Returns an error if the string is non-empty and not a valid date.
pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
