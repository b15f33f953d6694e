#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometric layout primitives for positioned PDF text.
//!
//! PDFs carry no table markup, only words with coordinates. This crate
//! provides the building blocks for recovering structure from geometry
//! alone:
//!
//! - [`page`] assembles per-page word dumps into one ordered token stream
//! - [`lines`] clusters tokens into visual lines by vertical tolerance
//! - [`search`] locates anchor text (section titles, column headers)
//! - [`running_headers`] strips boilerplate repeated on every page
//! - [`columns`] assigns tokens to the nearest column header
//! - [`keys`] normalizes free-form labels into snake-case field names

pub mod columns;
pub mod keys;
pub mod lines;
pub mod page;
pub mod running_headers;
pub mod search;

pub use phl_courts_layout_models::Token;

/// Errors raised while locating layout anchors.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A required anchor text does not appear anywhere in the tokens.
    #[error("No token matches '{text}'")]
    LookupFailure {
        /// The text (or pattern) that was searched for.
        text: String,
    },
}

/// Returns `true` if two coordinates are within `tolerance` of each other
/// (inclusive).
#[must_use]
pub fn aligned(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
