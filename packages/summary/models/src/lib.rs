#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed court summary records.
//!
//! A court summary reconstructed from a PDF is a three-level hierarchy:
//! a [`CourtSummary`] holds [`Docket`]s, each docket holds [`Charge`]s and
//! each charge holds [`Sentence`]s. Every level can be indexed, iterated
//! and measured in terms of its children, and the whole tree round-trips
//! through JSON.

pub mod date_format;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use phl_courts_layout_models::Token;

/// The report section a docket was listed under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocketStatus {
    /// Open cases
    #[default]
    Active,
    /// Closed cases
    Closed,
    /// Inactive cases
    Inactive,
    /// Archived cases (never emitted by the parser)
    Archived,
    /// Adjudicated cases
    Adjudicated,
}

impl DocketStatus {
    /// Every status, in the order sections are declared.
    pub const ALL: &[Self] = &[
        Self::Active,
        Self::Closed,
        Self::Inactive,
        Self::Archived,
        Self::Adjudicated,
    ];

    /// The section title as printed on the report.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
            Self::Inactive => "Inactive",
            Self::Archived => "Archived",
            Self::Adjudicated => "Adjudicated",
        }
    }
}

/// A sentence handed down for a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// The sentence type (e.g. "Probation").
    pub sentence_type: String,
    /// The date of the sentence.
    #[serde(default, with = "crate::date_format")]
    pub sentence_dt: Option<NaiveDate>,
    /// The program period.
    #[serde(default)]
    pub program_period: String,
    /// The length of the sentence.
    #[serde(default)]
    pub sentence_length: String,
}

/// A single charge on a docket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    /// The charge sequence number.
    pub seq_no: String,
    /// The statute charged.
    pub statute: String,
    /// Description of the statute.
    #[serde(default)]
    pub description: String,
    /// The grade, e.g. felony or misdemeanor class.
    #[serde(default)]
    pub grade: String,
    /// The disposition for the charge, if present.
    #[serde(default)]
    pub disposition: String,
    /// Sentences associated with the charge.
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

/// A docket (case) listed on the court summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docket {
    /// The docket number, e.g. `MC-51-CR-0000001-2021`.
    pub docket_number: String,
    /// The status of the docket proceedings.
    #[serde(default)]
    pub proc_status: String,
    /// The DC incident number.
    #[serde(default)]
    pub dc_no: String,
    /// The offense tracking number.
    #[serde(default)]
    pub otn: String,
    /// The PA county where the case is conducted.
    pub county: String,
    /// The report section the docket was listed under.
    pub status: DocketStatus,
    /// Header text that could not be parsed as `Key: Value`.
    #[serde(default)]
    pub extra: Vec<String>,
    /// The arrest date.
    #[serde(default, with = "crate::date_format")]
    pub arrest_dt: Option<NaiveDate>,
    /// Pre-sentence investigation number.
    #[serde(default)]
    pub psi_num: String,
    /// The probation number.
    #[serde(default)]
    pub prob_num: String,
    /// The disposition judge.
    #[serde(default)]
    pub disp_judge: String,
    /// The defense attorney.
    #[serde(default)]
    pub def_atty: String,
    /// The legacy number for the docket.
    #[serde(default)]
    pub legacy_no: String,
    /// The last action in the case.
    #[serde(default)]
    pub last_action: String,
    /// The room where the last action occurred.
    #[serde(default)]
    pub last_action_room: String,
    /// The date of the last action.
    #[serde(default, with = "crate::date_format")]
    pub last_action_date: Option<NaiveDate>,
    /// The next action to occur.
    #[serde(default)]
    pub next_action: String,
    /// The room where the next action will occur.
    #[serde(default)]
    pub next_action_room: String,
    /// The date of the next action.
    #[serde(default, with = "crate::date_format")]
    pub next_action_date: Option<NaiveDate>,
    /// The trial date.
    #[serde(default, with = "crate::date_format")]
    pub trial_dt: Option<NaiveDate>,
    /// The disposition date.
    #[serde(default, with = "crate::date_format")]
    pub disp_date: Option<NaiveDate>,
    /// Charges associated with this docket.
    #[serde(default)]
    pub charges: Vec<Charge>,
}

/// A defendant's court summary report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourtSummary {
    /// The defendant's name.
    pub name: String,
    /// The defendant's date of birth, as printed.
    pub date_of_birth: String,
    /// Eye color.
    #[serde(default)]
    pub eyes: String,
    /// Sex.
    #[serde(default)]
    pub sex: String,
    /// Hair color.
    #[serde(default)]
    pub hair: String,
    /// Race.
    #[serde(default)]
    pub race: String,
    /// The defendant's location.
    #[serde(default)]
    pub location: String,
    /// Known aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Dockets in document order.
    #[serde(default)]
    pub dockets: Vec<Docket>,
    /// The raw token stream the summary was parsed from. Dropped by
    /// [`CourtSummary::to_json`] in slim mode.
    #[serde(default)]
    pub tokens: Vec<Token>,
}

/// Implements the child-collection API (`len`, `iter`, indexing and
/// `IntoIterator`) for one level of the record hierarchy.
macro_rules! children {
    ($parent:ty, $field:ident, $child:ty) => {
        impl $parent {
            /// Returns the number of children.
            #[must_use]
            pub fn len(&self) -> usize {
                self.$field.len()
            }

            /// Returns `true` if there are no children.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.$field.is_empty()
            }

            /// Iterates over the children in document order.
            pub fn iter(&self) -> std::slice::Iter<'_, $child> {
                self.$field.iter()
            }
        }

        impl std::ops::Index<usize> for $parent {
            type Output = $child;

            fn index(&self, index: usize) -> &Self::Output {
                &self.$field[index]
            }
        }

        impl<'a> IntoIterator for &'a $parent {
            type Item = &'a $child;
            type IntoIter = std::slice::Iter<'a, $child>;

            fn into_iter(self) -> Self::IntoIter {
                self.$field.iter()
            }
        }
    };
}

children!(CourtSummary, dockets, Docket);
children!(Docket, charges, Charge);
children!(Charge, sentences, Sentence);

/// Serializes `value` to a JSON object and drops the named keys.
fn meta_of(
    value: &impl Serialize,
    exclude: &[&str],
) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(mut map) => {
            for key in exclude {
                map.remove(*key);
            }
            Ok(map)
        }
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

impl Charge {
    /// Returns every field except the sentences.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn meta(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        meta_of(self, &["sentences"])
    }
}

impl Docket {
    /// Returns every field except the charges.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn meta(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        meta_of(self, &["charges"])
    }
}

impl CourtSummary {
    /// Returns the defendant fields (everything except dockets and tokens).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn meta(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        meta_of(self, &["dockets", "tokens"])
    }

    /// Serializes the summary to JSON. In `slim` mode the raw token list
    /// is omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, slim: bool) -> serde_json::Result<String> {
        if slim {
            serde_json::to_string(&self.to_slim_value()?)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Like [`Self::to_json`], but indented.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self, slim: bool) -> serde_json::Result<String> {
        if slim {
            serde_json::to_string_pretty(&self.to_slim_value()?)
        } else {
            serde_json::to_string_pretty(self)
        }
    }

    fn to_slim_value(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("tokens");
        }
        Ok(value)
    }

    /// Deserializes a summary from a JSON string. Slim documents load with
    /// an empty token list.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a court summary.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Writes the summary as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn to_path(&self, path: &Path, slim: bool) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        if slim {
            serde_json::to_writer(writer, &self.to_slim_value()?)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Reads a summary previously written with [`Self::to_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// court summary.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
