//! Pennsylvania county codes as embedded in docket numbers.
//!
//! The second hyphen-delimited segment of a docket number is the county's
//! alphabetical index (`MC-51-...` is Philadelphia).

use crate::ParseError;

/// County names indexed by `code - 1`.
const COUNTIES: [&str; 67] = [
    "Adams",
    "Allegheny",
    "Armstrong",
    "Beaver",
    "Bedford",
    "Berks",
    "Blair",
    "Bradford",
    "Bucks",
    "Butler",
    "Cambria",
    "Cameron",
    "Carbon",
    "Centre",
    "Chester",
    "Clarion",
    "Clearfield",
    "Clinton",
    "Columbia",
    "Crawford",
    "Cumberland",
    "Dauphin",
    "Delaware",
    "Elk",
    "Erie",
    "Fayette",
    "Forest",
    "Franklin",
    "Fulton",
    "Greene",
    "Huntingdon",
    "Indiana",
    "Jefferson",
    "Juniata",
    "Lackawanna",
    "Lancaster",
    "Lawrence",
    "Lebanon",
    "Lehigh",
    "Luzerne",
    "Lycoming",
    "McKean",
    "Mercer",
    "Mifflin",
    "Monroe",
    "Montgomery",
    "Montour",
    "Northampton",
    "Northumberland",
    "Perry",
    "Philadelphia",
    "Pike",
    "Potter",
    "Schuylkill",
    "Snyder",
    "Somerset",
    "Sullivan",
    "Susquehanna",
    "Tioga",
    "Union",
    "Venango",
    "Warren",
    "Washington",
    "Wayne",
    "Westmoreland",
    "Wyoming",
    "York",
];

/// Returns the county for a numeric code (1 through 67).
#[must_use]
pub fn county_name(code: u32) -> Option<&'static str> {
    let index = usize::try_from(code.checked_sub(1)?).ok()?;
    COUNTIES.get(index).copied()
}

/// Resolves the county embedded in a docket number.
///
/// # Errors
///
/// Returns [`ParseError::MalformedDocketNumber`] if the docket number has
/// no numeric second segment, or [`ParseError::UnknownCountyCode`] if the
/// code is not a Pennsylvania county.
pub fn county_for_docket(docket_number: &str) -> Result<&'static str, ParseError> {
    let segment = docket_number
        .split('-')
        .nth(1)
        .ok_or_else(|| ParseError::MalformedDocketNumber {
            docket_number: docket_number.to_owned(),
        })?;

    let code: u32 = segment
        .trim()
        .parse()
        .map_err(|_| ParseError::MalformedDocketNumber {
            docket_number: docket_number.to_owned(),
        })?;

    county_name(code).ok_or_else(|| ParseError::UnknownCountyCode {
        docket_number: docket_number.to_owned(),
        code,
    })
}
