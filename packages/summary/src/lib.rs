#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Court summary report parser.
//!
//! Turns the positioned words of a First Judicial District court summary
//! PDF into a typed [`CourtSummary`]. The pipeline runs in document order:
//!
//! 1. [`sections`] slices the stream at each section title
//! 2. running page headers are stripped from each section
//! 3. [`dockets`] splits a section at docket number tokens
//! 4. [`docket_header`] reads the `Key: Value` block above each table
//! 5. [`table`] finds the charges table header rows and [`assembler`]
//!    stitches body lines into charges and sentences
//! 6. [`defendant`] reads the defendant block at the top of the report
//!
//! Geometric tolerances and vocabulary are read from [`SummaryConfig`].

pub mod assembler;
pub mod config;
pub mod counties;
pub mod defendant;
pub mod docket_header;
pub mod dockets;
pub mod sections;
pub mod table;

use std::collections::BTreeSet;
use std::path::Path;

use phl_courts_layout::LayoutError;
use phl_courts_layout::lines::group_into_lines;
use phl_courts_layout::page::TokenDocument;
use phl_courts_summary_models::{CourtSummary, Docket, DocketStatus, Token};

pub use config::SummaryConfig;
pub use dockets::DiscardedGroup;

use crate::assembler::assemble_charges;
use crate::defendant::parse_defendant;
use crate::docket_header::{build_docket, parse_header_fields, split_header};
use crate::dockets::{DocketGroup, split_dockets};
use crate::sections::slice_sections;
use crate::table::TableHeaders;

/// Errors raised while parsing a court summary.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A required anchor was not found.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A continuation line could not be attached to any field.
    #[error("Docket {docket_number}: no '{column}' field to continue with '{text}'")]
    SchemaViolation {
        docket_number: String,
        column: String,
        text: String,
    },

    /// The county code in a docket number is not a Pennsylvania county.
    #[error("Docket {docket_number}: unknown county code {code}")]
    UnknownCountyCode { docket_number: String, code: u32 },

    /// A docket number has no numeric county segment.
    #[error("Malformed docket number '{docket_number}'")]
    MalformedDocketNumber { docket_number: String },

    /// A charges table with more than two distinct header layouts.
    #[error("Docket {docket_number}: expected at most 2 header rows, found {count}")]
    UnexpectedHeaderRows { docket_number: String, count: usize },

    /// The defendant block lacks a required field.
    #[error("Defendant block is missing '{field}'")]
    MissingDefendantField { field: String },

    /// A normalized table column has no corresponding record field.
    #[error("Docket {docket_number}: unknown column '{column}'")]
    UnknownColumn {
        docket_number: String,
        column: String,
    },

    /// None of the configured section titles appear in the document.
    #[error("No section titles found")]
    NoSections,

    /// The configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A configured pattern is not a valid regex.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Token input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed summary along with anything the parser chose to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub summary: CourtSummary,
    /// Token groups of docket numbers that were already emitted.
    pub discarded: Vec<DiscardedGroup>,
}

/// Parses court summary token streams.
#[derive(Debug, Clone, Default)]
pub struct CourtSummaryParser {
    config: SummaryConfig,
}

impl CourtSummaryParser {
    #[must_use]
    pub const fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Parses one document.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] hit by any stage.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<CourtSummary, ParseError> {
        Ok(self.parse_detailed(tokens)?.summary)
    }

    /// Parses one document, also returning the discarded duplicate groups.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] hit by any stage.
    pub fn parse_detailed(&self, tokens: Vec<Token>) -> Result<ParsedDocument, ParseError> {
        let running_headers = self.config.running_headers.build()?;
        let sections = slice_sections(&tokens, &self.config)?;
        let first_section = sections
            .first()
            .map_or(DocketStatus::Active, |section| section.status);
        let defendant = parse_defendant(&tokens, first_section.title(), &self.config)?;

        let mut seen = BTreeSet::new();
        let mut dockets = Vec::new();
        let mut discarded = Vec::new();

        for section in &sections {
            if self.config.is_excluded(section.status) {
                log::debug!("Skipping excluded section '{}'", section.status.title());
                continue;
            }

            let stripped = running_headers.strip(section.tokens.to_vec());
            let split = split_dockets(&stripped, &self.config, &mut seen)?;
            log::debug!(
                "Section '{}': {} dockets",
                section.status.title(),
                split.groups.len()
            );

            for group in &split.groups {
                dockets.push(self.parse_docket(group, section.status)?);
            }
            discarded.extend(split.discarded);
        }

        log::info!(
            "Parsed {} dockets from {} sections for '{}'",
            dockets.len(),
            sections.len(),
            defendant.name
        );

        let summary = CourtSummary {
            name: defendant.name,
            date_of_birth: defendant.date_of_birth,
            eyes: defendant.eyes,
            sex: defendant.sex,
            hair: defendant.hair,
            race: defendant.race,
            location: defendant.location,
            aliases: defendant.aliases,
            dockets,
            tokens,
        };

        Ok(ParsedDocument { summary, discarded })
    }

    /// Parses a token JSON document: either a flat token array or per-page
    /// word lists.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the input is not a token document,
    /// or any parse error.
    pub fn parse_token_json(&self, json: &str) -> Result<ParsedDocument, ParseError> {
        let document: TokenDocument = serde_json::from_str(json)?;
        self.parse_detailed(document.into_tokens(self.config.footer_cutoff))
    }

    /// Reads and parses a token JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the file cannot be read, or any error
    /// from [`Self::parse_token_json`].
    pub fn parse_path(&self, path: &Path) -> Result<ParsedDocument, ParseError> {
        log::debug!("Reading tokens from {}", path.display());
        self.parse_token_json(&std::fs::read_to_string(path)?)
    }

    fn parse_docket(
        &self,
        group: &DocketGroup<'_>,
        status: DocketStatus,
    ) -> Result<Docket, ParseError> {
        let docket_number = group.docket_number.as_str();
        let (header_tokens, body) = split_header(group.tokens);

        let fields =
            parse_header_fields(docket_number, header_tokens, &self.config.key_punctuation);
        let mut docket = build_docket(group, status, fields);

        match TableHeaders::detect(docket_number, group.tokens)? {
            Some(headers) => {
                let lines = group_into_lines(body, self.config.line_tolerance);
                docket.charges = assemble_charges(
                    docket_number,
                    &lines,
                    &headers,
                    self.config.column_alignment_tolerance,
                    &self.config.key_punctuation,
                )?;
            }
            None if !body.is_empty() => {
                log::warn!("{docket_number}: body without a charges header, no charges parsed");
            }
            None => {}
        }

        log::debug!("{docket_number}: {} charges", docket.charges.len());
        Ok(docket)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use phl_courts_layout::search::Missing;

    use super::*;

    const FIRST: &str = "MC-51-CR-0000001-2021";
    const SECOND: &str = "CP-51-CR-0000002-2020";

    /// Builds a token stream in reading order.
    struct Fixture {
        tokens: Vec<Token>,
    }

    impl Fixture {
        fn new() -> Self {
            Self { tokens: Vec::new() }
                .banner(10.0)
                .at(
                    40.0,
                    &[(30.0, "Doe, John"), (300.0, "DOB: 01/01/1980"), (450.0, "Eyes: Brown")],
                )
                .at(50.0, &[(30.0, "Philadelphia, PA 19107"), (450.0, "Sex: Male")])
                .at(60.0, &[(30.0, "Aliases:"), (450.0, "Hair: Black")])
                .at(70.0, &[(30.0, "Doe, Johnny"), (450.0, "Race: White")])
        }

        fn at(mut self, y: f64, cells: &[(f64, &str)]) -> Self {
            self.tokens
                .extend(cells.iter().map(|(x, text)| Token::new(*x, y, *text)));
            self
        }

        fn banner(self, y: f64) -> Self {
            self.at(y, &[(200.0, "First Judicial District of Pennsylvania")])
                .at(y + 10.0, &[(250.0, "Court Summary")])
        }

        fn section(self, y: f64, title: &str) -> Self {
            self.at(y, &[(30.0, title)])
        }

        fn docket(self, y: f64, number: &str) -> Self {
            self.at(y, &[(30.0, number), (200.0, "Proc Status: Sentenced/Penalty Imposed")])
                .at(y + 10.0, &[(30.0, "OTN: N1234567"), (200.0, "Arrest Dt: 01/02/2021")])
        }

        fn primary_header(self, y: f64) -> Self {
            self.at(
                y,
                &[
                    (30.0, "Seq No"),
                    (80.0, "Statute"),
                    (180.0, "Grade"),
                    (220.0, "Description"),
                    (420.0, "Disposition"),
                ],
            )
        }

        fn secondary_header(self, y: f64) -> Self {
            self.at(
                y,
                &[
                    (60.0, "Sentence Dt."),
                    (150.0, "Sentence Type"),
                    (300.0, "Program Period"),
                    (420.0, "Sentence Length"),
                ],
            )
        }

        fn charge(self, y: f64, seq: &str, description: &str) -> Self {
            self.at(
                y,
                &[
                    (30.5, seq),
                    (80.0, "18 § 2701"),
                    (181.0, "M2"),
                    (221.0, description),
                    (420.0, "Guilty"),
                ],
            )
        }

        fn build(self) -> Vec<Token> {
            self.tokens
        }
    }

    fn single_record() -> Vec<Token> {
        Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .charge(170.0, "1", "Simple Assault")
            .build()
    }

    fn parse(tokens: Vec<Token>) -> CourtSummary {
        CourtSummaryParser::default().parse(tokens).unwrap()
    }

    #[test]
    fn errors_render_context() {
        let err = ParseError::UnknownCountyCode {
            docket_number: "MC-99-CR-1".to_owned(),
            code: 99,
        };
        assert_eq!(err.to_string(), "Docket MC-99-CR-1: unknown county code 99");

        let err = ParseError::from(LayoutError::LookupFailure {
            text: "Active".to_owned(),
        });
        assert_eq!(err.to_string(), "No token matches 'Active'");
    }

    #[test]
    fn parses_single_page_record() {
        let summary = parse(single_record());

        assert_eq!(summary.name, "Doe, John");
        assert_eq!(summary.date_of_birth, "01/01/1980");
        assert_eq!(summary.location, "Philadelphia, PA 19107");
        assert_eq!(summary.aliases, vec!["Doe, Johnny"]);
        assert_eq!(summary.sex, "male");

        assert_eq!(summary.len(), 1);
        let docket = &summary[0];
        assert_eq!(docket.docket_number, FIRST);
        assert_eq!(docket.county, "Philadelphia");
        assert_eq!(docket.status, DocketStatus::Active);
        assert_eq!(docket.proc_status, "Sentenced/Penalty Imposed");
        assert_eq!(docket.otn, "N1234567");
        assert_eq!(docket.arrest_dt, NaiveDate::from_ymd_opt(2021, 1, 2));
        assert!(docket.extra.is_empty());

        assert_eq!(docket.len(), 1);
        let charge = &docket[0];
        assert_eq!(charge.seq_no, "1");
        assert_eq!(charge.statute, "18 § 2701");
        assert_eq!(charge.grade, "M2");
        assert_eq!(charge.description, "Simple Assault");
        assert_eq!(charge.disposition, "Guilty");
        assert!(charge.sentences.is_empty());
    }

    #[test]
    fn attaches_sentence_under_multiline_header() {
        let tokens = Fixture::new()
            .section(100.0, "Closed")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .secondary_header(160.0)
            .charge(180.0, "1", "Simple Assault")
            .at(190.0, &[(60.0, "01/01/2021"), (150.0, "Probation")])
            .build();

        let summary = parse(tokens);

        let docket = &summary[0];
        assert_eq!(docket.status, DocketStatus::Closed);
        assert_eq!(docket.len(), 1);
        assert_eq!(docket[0].len(), 1);
        assert_eq!(docket[0][0].sentence_type, "Probation");
        assert_eq!(docket[0][0].sentence_dt, NaiveDate::from_ymd_opt(2021, 1, 1));
    }

    #[test]
    fn merges_wrapped_description() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .charge(170.0, "1", "Recklessly Endangering")
            .at(180.0, &[(222.0, "Another Person")])
            .charge(200.0, "2", "Simple Assault")
            .build();

        let summary = parse(tokens);

        assert_eq!(summary[0].len(), 2);
        assert_eq!(
            summary[0][0].description,
            "Recklessly Endangering Another Person"
        );
        assert_eq!(summary[0][1].description, "Simple Assault");
    }

    #[test]
    fn repeated_docket_on_later_page_is_discarded() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .charge(170.0, "1", "Simple Assault")
            .docket(300.0, SECOND)
            .primary_header(330.0)
            .charge(350.0, "1", "Theft")
            .banner(650.0)
            .at(670.0, &[(30.0, "Active (Continued)")])
            .docket(700.0, FIRST)
            .primary_header(730.0)
            .charge(750.0, "1", "Simple Assault")
            .build();

        let parsed = CourtSummaryParser::default().parse_detailed(tokens).unwrap();

        let numbers: Vec<&str> = parsed
            .summary
            .iter()
            .map(|docket| docket.docket_number.as_str())
            .collect();
        assert_eq!(numbers, vec![FIRST, SECOND]);
        assert_eq!(parsed.summary[1].len(), 1);
        assert_eq!(parsed.discarded.len(), 1);
        assert_eq!(parsed.discarded[0].docket_number, FIRST);
    }

    #[test]
    fn missing_optional_section_is_skipped() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .charge(170.0, "1", "Simple Assault")
            .section(200.0, "Closed")
            .docket(220.0, SECOND)
            .primary_header(250.0)
            .charge(270.0, "1", "Theft")
            .build();

        let summary = parse(tokens.clone());

        let statuses: Vec<DocketStatus> = summary.iter().map(|d| d.status).collect();
        assert_eq!(statuses, vec![DocketStatus::Active, DocketStatus::Closed]);

        let strict = CourtSummaryParser::new(SummaryConfig {
            missing_sections: Missing::Raise,
            ..SummaryConfig::default()
        });
        assert!(matches!(strict.parse(tokens), Err(ParseError::Layout(_))));
    }

    #[test]
    fn archived_section_is_not_emitted() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .section(200.0, "Archived")
            .docket(220.0, SECOND)
            .build();

        let summary = parse(tokens);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].docket_number, FIRST);
        assert!(summary[0].is_empty());
    }

    #[test]
    fn output_round_trips_and_counts_agree() {
        let summary = parse(single_record());

        let restored = CourtSummary::from_json(&summary.to_json(false).unwrap()).unwrap();
        assert_eq!(restored, summary);

        assert_eq!(summary.len(), summary.dockets.len());
        assert_eq!(summary[0], summary.dockets[0]);
        for docket in &summary {
            assert_eq!(docket.len(), docket.charges.len());
            for charge in docket {
                assert_eq!(charge.len(), charge.sentences.len());
            }
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        let first = parse(single_record()).to_json(false).unwrap();
        let second = parse(single_record()).to_json(false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parses_token_json() {
        let tokens = single_record();
        let json = serde_json::to_string(&tokens).unwrap();

        let parsed = CourtSummaryParser::default().parse_token_json(&json).unwrap();

        assert_eq!(parsed.summary, parse(tokens));
    }

    #[test]
    fn token_json_must_be_valid() {
        let err = CourtSummaryParser::default()
            .parse_token_json("{not json")
            .unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn orphan_continuation_is_a_schema_violation() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, FIRST)
            .primary_header(150.0)
            .at(170.0, &[(30.0, "1"), (80.0, "18 § 2701")])
            .at(180.0, &[(420.0, "Guilty")])
            .build();

        let err = CourtSummaryParser::default().parse(tokens).unwrap_err();

        assert!(matches!(err, ParseError::SchemaViolation { .. }));
    }

    #[test]
    fn unknown_county_code_fails_the_parse() {
        let tokens = Fixture::new()
            .section(100.0, "Active")
            .docket(120.0, "MC-99-CR-0000001-2021")
            .build();

        let err = CourtSummaryParser::default().parse(tokens).unwrap_err();

        assert!(matches!(err, ParseError::UnknownCountyCode { code: 99, .. }));
    }
}
