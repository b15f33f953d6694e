//! Layout calibration for court summary reports.
//!
//! The tolerances below were tuned empirically against real reports. They
//! live in configuration rather than code so they can be recalibrated when
//! the report layout drifts. The shipped defaults are in
//! `config/court_summary.toml`.

use phl_courts_layout::running_headers::RunningHeaders;
use phl_courts_layout::search::Missing;
use phl_courts_summary_models::DocketStatus;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// How the county of each docket is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountyResolution {
    /// Look up the numeric code embedded in the docket number.
    #[default]
    Code,
    /// Use a county label printed directly above the docket number,
    /// falling back to the previous docket's county.
    AdjacentLabel,
}

/// Running header (page banner) detection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunningHeaderConfig {
    /// Regex matching the first token of each banner block.
    pub anchor_pattern: String,
    /// Exact boilerplate texts.
    pub phrases: Vec<String>,
    /// Any token containing this text is boilerplate.
    pub continued_marker: String,
    /// Number of tokens examined from each anchor.
    pub block_size: usize,
}

impl Default for RunningHeaderConfig {
    fn default() -> Self {
        Self {
            anchor_pattern:
                "(First Judicial District of Pennsylvania)|(.* County Court of Common Pleas)"
                    .to_owned(),
            phrases: vec!["Court Summary".to_owned()],
            continued_marker: "Continued".to_owned(),
            block_size: phl_courts_layout::running_headers::DEFAULT_BLOCK_SIZE,
        }
    }
}

impl RunningHeaderConfig {
    /// Compiles the stripper.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Regex`] if `anchor_pattern` is invalid.
    pub fn build(&self) -> Result<RunningHeaders, ParseError> {
        Ok(RunningHeaders::new(
            Regex::new(&self.anchor_pattern)?,
            self.phrases.clone(),
            self.continued_marker.clone(),
            self.block_size,
        ))
    }
}

/// Complete parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    /// Title token separating the banner from the defendant header.
    pub report_title: String,
    /// Prefixes identifying docket number tokens.
    pub docket_prefixes: Vec<String>,
    /// Vertical tolerance for grouping docket rows into lines.
    pub line_tolerance: f64,
    /// Horizontal tolerance for aligning a row with a header's first column.
    pub column_alignment_tolerance: f64,
    /// Horizontal tolerance for a county label above a docket number.
    pub label_x_tolerance: f64,
    /// Vertical tolerance for a county label above a docket number.
    pub label_y_tolerance: f64,
    /// Page height cutoff used when assembling per-page word dumps.
    pub footer_cutoff: f64,
    /// Section titles to look for.
    pub sections: Vec<DocketStatus>,
    /// Sections that delimit others but are never emitted.
    pub excluded_sections: Vec<DocketStatus>,
    /// Whether a missing section is an error.
    pub missing_sections: Missing,
    /// How docket counties are resolved.
    pub county_resolution: CountyResolution,
    /// Characters stripped from keys during normalization.
    pub key_punctuation: Vec<String>,
    /// Page banner detection.
    pub running_headers: RunningHeaderConfig,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            report_title: "Court Summary".to_owned(),
            docket_prefixes: vec!["MC-".to_owned(), "CP-".to_owned()],
            line_tolerance: phl_courts_layout::lines::DEFAULT_LINE_TOLERANCE,
            column_alignment_tolerance: 1.0,
            label_x_tolerance: 0.5,
            label_y_tolerance: 15.0,
            footer_cutoff: phl_courts_layout::page::DEFAULT_FOOTER_CUTOFF,
            sections: DocketStatus::ALL.to_vec(),
            excluded_sections: vec![DocketStatus::Archived],
            missing_sections: Missing::Ignore,
            county_resolution: CountyResolution::Code,
            key_punctuation: phl_courts_layout::keys::DEFAULT_PUNCTUATION
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            running_headers: RunningHeaderConfig::default(),
        }
    }
}

impl SummaryConfig {
    /// Parses a configuration from TOML. Omitted fields take their default
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Config`] if the TOML is malformed or contains
    /// unknown fields.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ParseError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Returns `true` if dockets in `status` are dropped from the output.
    #[must_use]
    pub fn is_excluded(&self, status: DocketStatus) -> bool {
        self.excluded_sections.contains(&status)
    }

    /// Returns `true` if `text` looks like a docket number.
    #[must_use]
    pub fn is_docket_number(&self, text: &str) -> bool {
        self.docket_prefixes
            .iter()
            .any(|prefix| text.starts_with(prefix.as_str()))
    }
}
