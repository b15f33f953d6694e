//! Stitching table lines into charges and sentences.
//!
//! Every body line is classified against the table headers:
//!
//! - a **charge row** starts with a sequence number aligned with the
//!   primary header's first column
//! - a **sentence row** is aligned with the secondary header's first column
//! - anything else is a **continuation** of a field wrapped from the line
//!   above
//!
//! The classification drives a small state machine folded over the lines.
//! The charge in progress is only emitted on the next charge row or by the
//! final flush, so the last charge of a docket is never lost.

use std::collections::BTreeMap;

use phl_courts_layout::aligned;
use phl_courts_layout::keys::normalize_keys;
use phl_courts_layout::lines::Line;
use phl_courts_summary_models::{Charge, Sentence, date_format};

use crate::ParseError;
use crate::table::{Column, TableHeaders};

/// A charge row under construction, keyed by table column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeRow {
    fields: BTreeMap<Column, String>,
    sentences: Vec<BTreeMap<Column, String>>,
}

impl ChargeRow {
    fn append(
        &mut self,
        docket_number: &str,
        column: Column,
        text: String,
    ) -> Result<(), ParseError> {
        let target = if self.fields.contains_key(&column) {
            self.fields.get_mut(&column)
        } else {
            self.sentences
                .last_mut()
                .and_then(|sentence| sentence.get_mut(&column))
        };

        match target {
            Some(value) => {
                value.push(' ');
                value.push_str(&text);
                Ok(())
            }
            None => Err(ParseError::SchemaViolation {
                docket_number: docket_number.to_owned(),
                column: column.to_string(),
                text,
            }),
        }
    }

    /// Converts the row into a typed charge, normalizing column labels into
    /// field names first.
    ///
    /// Sentence columns printed on the charge row itself (single-row table
    /// layouts) become the charge's first sentence.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownColumn`] if a normalized label is not a
    /// known field.
    pub fn into_charge<P: AsRef<str>>(
        self,
        docket_number: &str,
        punctuation: &[P],
    ) -> Result<Charge, ParseError> {
        let (inline, own): (BTreeMap<Column, String>, BTreeMap<Column, String>) = self
            .fields
            .into_iter()
            .partition(|(column, _)| column.is_sentence_field());

        let mut charge = Charge::default();
        for (key, value) in normalize_keys(own.iter().map(|(c, v)| (c.as_ref(), v)), punctuation) {
            let slot = match key.as_str() {
                "seq_no" => &mut charge.seq_no,
                "statute" => &mut charge.statute,
                "description" => &mut charge.description,
                "grade" => &mut charge.grade,
                "disposition" => &mut charge.disposition,
                _ => return Err(unknown_column(docket_number, key)),
            };
            value.clone_into(slot);
        }

        if !inline.is_empty() {
            charge
                .sentences
                .push(to_sentence(docket_number, &inline, punctuation)?);
        }
        for sentence in &self.sentences {
            charge
                .sentences
                .push(to_sentence(docket_number, sentence, punctuation)?);
        }

        Ok(charge)
    }
}

fn to_sentence<P: AsRef<str>>(
    docket_number: &str,
    fields: &BTreeMap<Column, String>,
    punctuation: &[P],
) -> Result<Sentence, ParseError> {
    let mut sentence = Sentence::default();
    for (key, value) in normalize_keys(fields.iter().map(|(c, v)| (c.as_ref(), v)), punctuation) {
        match key.as_str() {
            "sentence_type" => value.clone_into(&mut sentence.sentence_type),
            "sentence_dt" => sentence.sentence_dt = date_format::parse(value),
            "program_period" => value.clone_into(&mut sentence.program_period),
            "sentence_length" => value.clone_into(&mut sentence.sentence_length),
            _ => return Err(unknown_column(docket_number, key)),
        }
    }
    Ok(sentence)
}

fn unknown_column(docket_number: &str, column: String) -> ParseError {
    ParseError::UnknownColumn {
        docket_number: docket_number.to_owned(),
        column,
    }
}

/// How a body line relates to the rows before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Opens a new charge.
    Charge,
    /// Adds a sentence to the current charge.
    Sentence,
    /// Extends fields of the current charge or sentence.
    Continuation,
}

/// Classifies a line by its leading token.
#[must_use]
pub fn classify(line: &Line, headers: &TableHeaders, tolerance: f64) -> LineKind {
    let Some(first) = line.first() else {
        return LineKind::Continuation;
    };

    let numeric = !first.text.is_empty() && first.text.chars().all(|c| c.is_ascii_digit());
    if numeric && aligned(first.x, headers.primary.first_x(), tolerance) {
        return LineKind::Charge;
    }

    if headers
        .secondary
        .as_ref()
        .is_some_and(|secondary| aligned(first.x, secondary.first_x(), tolerance))
    {
        return LineKind::Sentence;
    }

    LineKind::Continuation
}

/// Assembly state between lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// No charge row has been seen yet.
    AwaitingRecord,
    /// The last row was a charge row or a continuation of one.
    InRecord(ChargeRow),
    /// The last row was a sentence row or a continuation of one.
    InSubrecord(ChargeRow),
}

/// Folds body lines into charge rows.
pub struct Assembler<'a> {
    docket_number: &'a str,
    headers: &'a TableHeaders,
    tolerance: f64,
    done: Vec<ChargeRow>,
}

impl<'a> Assembler<'a> {
    #[must_use]
    pub const fn new(docket_number: &'a str, headers: &'a TableHeaders, tolerance: f64) -> Self {
        Self {
            docket_number,
            headers,
            tolerance,
            done: Vec::new(),
        }
    }

    /// Applies one line to the state.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::SchemaViolation`] if a sentence row or a
    /// continuation has no charge to attach to, or a continued field exists
    /// on neither the charge nor its last sentence.
    pub fn step(&mut self, state: State, line: &Line) -> Result<State, ParseError> {
        let kind = classify(line, self.headers, self.tolerance);
        log::trace!("{}: {kind:?} line '{}'", self.docket_number, line.text());

        match (state, kind) {
            (state, LineKind::Charge) => {
                self.flush(state);
                Ok(State::InRecord(ChargeRow {
                    fields: self.headers.primary.map_line(&line.tokens),
                    sentences: Vec::new(),
                }))
            }
            (State::InRecord(mut row) | State::InSubrecord(mut row), LineKind::Sentence) => {
                if let Some(secondary) = &self.headers.secondary {
                    row.sentences.push(secondary.map_line(&line.tokens));
                }
                Ok(State::InSubrecord(row))
            }
            (State::InRecord(mut row), LineKind::Continuation) => {
                self.continue_row(&mut row, line, false)?;
                Ok(State::InRecord(row))
            }
            (State::InSubrecord(mut row), LineKind::Continuation) => {
                self.continue_row(&mut row, line, true)?;
                Ok(State::InSubrecord(row))
            }
            (State::AwaitingRecord, LineKind::Sentence | LineKind::Continuation) => {
                Err(ParseError::SchemaViolation {
                    docket_number: self.docket_number.to_owned(),
                    column: String::new(),
                    text: line.text(),
                })
            }
        }
    }

    /// Emits the charge in progress and returns every assembled row.
    #[must_use]
    pub fn finish(mut self, state: State) -> Vec<ChargeRow> {
        self.flush(state);
        self.done
    }

    fn flush(&mut self, state: State) {
        match state {
            State::AwaitingRecord => {}
            State::InRecord(row) | State::InSubrecord(row) => self.done.push(row),
        }
    }

    fn continue_row(
        &self,
        row: &mut ChargeRow,
        line: &Line,
        in_sentence: bool,
    ) -> Result<(), ParseError> {
        let header = match (&self.headers.secondary, in_sentence) {
            (Some(secondary), true) => secondary,
            _ => &self.headers.primary,
        };
        for (column, text) in header.map_line(&line.tokens) {
            row.append(self.docket_number, column, text)?;
        }
        Ok(())
    }
}

/// Assembles the charges of one docket from its body lines.
///
/// Repeated header rows and lines opening with the docket number (banner
/// repeats on continuation pages) are skipped.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised by [`Assembler::step`] or by
/// [`ChargeRow::into_charge`].
pub fn assemble_charges<P: AsRef<str>>(
    docket_number: &str,
    lines: &[Line],
    headers: &TableHeaders,
    tolerance: f64,
    punctuation: &[P],
) -> Result<Vec<Charge>, ParseError> {
    let mut assembler = Assembler::new(docket_number, headers, tolerance);

    let state = lines
        .iter()
        .filter(|line| !headers.is_header_line(&line.texts()))
        .filter(|line| line.first().is_none_or(|first| first.text != docket_number))
        .try_fold(State::AwaitingRecord, |state, line| assembler.step(state, line))?;

    assembler
        .finish(state)
        .into_iter()
        .map(|row| row.into_charge(docket_number, punctuation))
        .collect()
}
