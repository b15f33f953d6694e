//! Assembly of per-page word dumps into a single token stream.
//!
//! Word extraction happens outside this workspace (e.g. pdfplumber's
//! `extract_words`). Each page's words arrive with page-local coordinates;
//! this module applies the footer cutoff, offsets every page so vertical
//! positions increase monotonically across the document, and sorts into
//! reading order.

use phl_courts_layout_models::Token;
use serde::{Deserialize, Serialize};

/// The vertical cutoff used by court summary reports. Anything at or below
/// this line on a page is footer.
pub const DEFAULT_FOOTER_CUTOFF: f64 = 640.0;

/// A word as reported by the extractor, in page-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    #[serde(default)]
    pub bottom: Option<f64>,
    /// Untrimmed text.
    pub text: String,
}

/// A token document as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenDocument {
    /// Per-page word dumps that still need [`assemble_pages`].
    Pages {
        /// Words for each page, in page order.
        pages: Vec<Vec<RawWord>>,
    },
    /// An already-assembled token stream.
    Tokens(Vec<Token>),
}

impl TokenDocument {
    /// Converts the document into an ordered token stream.
    #[must_use]
    pub fn into_tokens(self, footer_cutoff: f64) -> Vec<Token> {
        match self {
            Self::Pages { pages } => assemble_pages(&pages, footer_cutoff),
            Self::Tokens(mut tokens) => {
                tokens.sort_by(Token::reading_order);
                tokens
            }
        }
    }
}

/// Builds the document token stream from per-page words.
///
/// Words at or below `footer_cutoff` are dropped, as are words that are
/// blank once trimmed. Page `i` is shifted down by `i * footer_cutoff`.
#[must_use]
pub fn assemble_pages(pages: &[Vec<RawWord>], footer_cutoff: f64) -> Vec<Token> {
    let mut out = Vec::new();

    for (index, words) in pages.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let offset = index as f64 * footer_cutoff;

        let mut page: Vec<Token> = words
            .iter()
            .filter(|word| word.top < footer_cutoff)
            .filter_map(|word| {
                let text = word.text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(Token {
                    x: word.x0,
                    y: word.top + offset,
                    bottom: word.bottom.map(|bottom| bottom + offset),
                    text: text.to_owned(),
                })
            })
            .collect();

        page.sort_by(Token::reading_order);
        out.extend(page);
    }

    log::debug!(
        "Assembled {} tokens from {} page(s)",
        out.len(),
        pages.len()
    );

    out
}
