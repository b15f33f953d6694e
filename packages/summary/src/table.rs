//! The charges table: its column vocabulary and header rows.

use std::str::FromStr;

use phl_courts_layout::columns::{HeaderCell, HeaderRow};
use phl_courts_layout::lines::partition_by;
use phl_courts_summary_models::Token;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::ParseError;

/// A charges table column, named exactly as printed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
pub enum Column {
    #[strum(serialize = "Seq No")]
    SeqNo,
    #[strum(serialize = "Statute")]
    Statute,
    #[strum(serialize = "Grade")]
    Grade,
    #[strum(serialize = "Description")]
    Description,
    #[strum(serialize = "Disposition")]
    Disposition,
    #[strum(serialize = "Sentence Dt.")]
    SentenceDt,
    #[strum(serialize = "Sentence Type")]
    SentenceType,
    #[strum(serialize = "Program Period")]
    ProgramPeriod,
    #[strum(serialize = "Sentence Length")]
    SentenceLength,
}

impl Column {
    /// Returns `true` for columns that describe a sentence rather than a
    /// charge.
    #[must_use]
    pub const fn is_sentence_field(self) -> bool {
        matches!(
            self,
            Self::SentenceDt | Self::SentenceType | Self::ProgramPeriod | Self::SentenceLength
        )
    }
}

/// The header rows of one docket's charges table.
///
/// The first distinct row is the primary header used for charge rows. A
/// second distinct row, when present, lays out sentence rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeaders {
    /// Layout of charge rows.
    pub primary: HeaderRow<Column>,
    /// Layout of sentence rows, for multi-line headers.
    pub secondary: Option<HeaderRow<Column>>,
    layouts: Vec<Vec<String>>,
}

impl TableHeaders {
    /// Finds the header rows among a docket's tokens.
    ///
    /// Header tokens are grouped by exact vertical position. Rows repeated
    /// on later pages collapse into the first occurrence. Returns `None`
    /// when the docket has no charges table.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedHeaderRows`] if more than two
    /// distinct header layouts appear.
    pub fn detect(docket_number: &str, tokens: &[Token]) -> Result<Option<Self>, ParseError> {
        let header_tokens: Vec<Token> = tokens
            .iter()
            .filter(|token| Column::from_str(&token.text).is_ok())
            .cloned()
            .collect();

        let mut layouts: Vec<Vec<String>> = Vec::new();
        let mut rows: Vec<HeaderRow<Column>> = Vec::new();

        for (_, mut members) in partition_by(&header_tokens, |token| token.y) {
            members.sort_by(|a, b| a.x.total_cmp(&b.x));
            let texts: Vec<String> = members.iter().map(|t| t.text.clone()).collect();
            if layouts.contains(&texts) {
                continue;
            }

            let cells = members
                .iter()
                .filter_map(|token| {
                    Column::from_str(&token.text)
                        .ok()
                        .map(|column| HeaderCell { column, x: token.x })
                })
                .collect();
            if let Some(row) = HeaderRow::new(cells) {
                layouts.push(texts);
                rows.push(row);
            }
        }

        if rows.len() > 2 {
            return Err(ParseError::UnexpectedHeaderRows {
                docket_number: docket_number.to_owned(),
                count: rows.len(),
            });
        }

        let mut rows = rows.into_iter();
        let Some(primary) = rows.next() else {
            return Ok(None);
        };

        Ok(Some(Self {
            primary,
            secondary: rows.next(),
            layouts,
        }))
    }

    /// Returns `true` if `texts` reproduce one of the header rows, which
    /// happens when a header repeats at the top of a page.
    #[must_use]
    pub fn is_header_line(&self, texts: &[&str]) -> bool {
        self.layouts
            .iter()
            .any(|layout| layout.iter().map(String::as_str).eq(texts.iter().copied()))
    }
}
