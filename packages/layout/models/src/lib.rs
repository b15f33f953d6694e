#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Positioned text fragments extracted from a PDF.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single word extracted from the PDF along with its position.
///
/// `y` is the top of the word after the per-page offset has been applied,
/// so tokens from different pages order monotonically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Horizontal start coordinate.
    pub x: f64,
    /// Vertical (top) coordinate.
    pub y: f64,
    /// Vertical bottom coordinate, when the extractor provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    /// Trimmed word text.
    pub text: String,
}

impl Token {
    /// Creates a token without a bottom extent.
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            bottom: None,
            text: text.into(),
        }
    }

    /// Sets the bottom extent.
    #[must_use]
    pub const fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = Some(bottom);
        self
    }

    /// Reading order: top-to-bottom, then left-to-right.
    #[must_use]
    pub fn reading_order(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }
}
