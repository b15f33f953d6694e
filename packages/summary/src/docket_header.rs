//! The `Key: Value` block printed above each docket's charges table.

use std::collections::BTreeMap;

use phl_courts_layout::keys::normalize_key;
use phl_courts_layout::search::{Missing, TextMatch, find_line_number};
use phl_courts_summary_models::{Docket, DocketStatus, Token, date_format};

use crate::dockets::DocketGroup;

/// The text that opens the charges table.
pub const TABLE_ANCHOR: &str = "Seq No";

/// Splits a docket's tokens at the first [`TABLE_ANCHOR`].
///
/// A docket whose table starts on a later page has no anchor among its own
/// tokens; all of its tokens are then header.
#[must_use]
pub fn split_header(tokens: &[Token]) -> (&[Token], &[Token]) {
    match find_line_number(tokens, &TextMatch::Equals(TABLE_ANCHOR), Missing::Ignore) {
        Ok(Some(index)) => tokens.split_at(index),
        _ => (tokens, &[]),
    }
}

/// Parsed header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    /// Normalized key to value, first occurrence wins.
    pub fields: BTreeMap<String, String>,
    /// Header text that is not a single `Key: Value` pair.
    pub extra: Vec<String>,
}

/// Parses header tokens, skipping the leading docket number token.
///
/// Each token is split on `:`. Exactly two parts make a field. Anything
/// else, unless it is the docket number repeated, is kept verbatim in
/// `extra`, one entry per part.
#[must_use]
pub fn parse_header_fields<P: AsRef<str>>(
    docket_number: &str,
    tokens: &[Token],
    punctuation: &[P],
) -> HeaderFields {
    let mut header = HeaderFields::default();

    for token in tokens.iter().skip(1) {
        let parts: Vec<&str> = token.text.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [key, value] => {
                header
                    .fields
                    .entry(normalize_key(key, punctuation))
                    .or_insert_with(|| (*value).to_owned());
            }
            [only] if *only == docket_number => {}
            _ => {
                log::debug!("{docket_number}: unparsed header text '{}'", token.text);
                header.extra.extend(parts.iter().map(|part| (*part).to_owned()));
            }
        }
    }

    header
}

fn take(fields: &mut BTreeMap<String, String>, key: &str) -> String {
    fields.remove(key).unwrap_or_default()
}

fn take_date(fields: &mut BTreeMap<String, String>, key: &str) -> Option<chrono::NaiveDate> {
    fields.remove(key).and_then(|value| date_format::parse(&value))
}

/// Builds a docket from its group, header fields and section.
///
/// Keys with no docket field are appended to `extra` as `key: value`.
#[must_use]
pub fn build_docket(group: &DocketGroup<'_>, status: DocketStatus, header: HeaderFields) -> Docket {
    let HeaderFields {
        mut fields,
        mut extra,
    } = header;

    if let Some(value) = fields.remove("prob_#") {
        fields.entry("prob_num".to_owned()).or_insert(value);
    }
    if let Some(value) = fields.remove("psi#") {
        fields.entry("psi_num".to_owned()).or_insert(value);
    }

    let docket = Docket {
        docket_number: group.docket_number.clone(),
        proc_status: take(&mut fields, "proc_status"),
        dc_no: take(&mut fields, "dc_no"),
        otn: take(&mut fields, "otn"),
        county: group.county.clone(),
        status,
        arrest_dt: take_date(&mut fields, "arrest_dt"),
        psi_num: take(&mut fields, "psi_num"),
        prob_num: take(&mut fields, "prob_num"),
        disp_judge: take(&mut fields, "disp_judge"),
        def_atty: take(&mut fields, "def_atty"),
        legacy_no: take(&mut fields, "legacy_no"),
        last_action: take(&mut fields, "last_action"),
        last_action_room: take(&mut fields, "last_action_room"),
        last_action_date: take_date(&mut fields, "last_action_date"),
        next_action: take(&mut fields, "next_action"),
        next_action_room: take(&mut fields, "next_action_room"),
        next_action_date: take_date(&mut fields, "next_action_date"),
        trial_dt: take_date(&mut fields, "trial_dt"),
        disp_date: take_date(&mut fields, "disp_date"),
        extra: Vec::new(),
        charges: Vec::new(),
    };

    for (key, value) in fields {
        log::debug!("{}: no field for header '{key}'", group.docket_number);
        extra.push(format!("{key}: {value}"));
    }

    Docket { extra, ..docket }
}
