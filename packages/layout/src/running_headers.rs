//! Removal of boilerplate repeated at the top of every page.
//!
//! Each page of a report opens with the same banner block (court name,
//! report title, "Continued" markers). The block is found by an anchor
//! pattern and removed token by token, but only tokens that are themselves
//! boilerplate are removed, so data that directly follows a banner
//! survives.

use phl_courts_layout_models::Token;
use regex::Regex;

use crate::search::{TextMatch, matching_indices};

/// Default number of tokens examined after each anchor.
pub const DEFAULT_BLOCK_SIZE: usize = 5;

/// Detects and strips running page headers.
#[derive(Debug, Clone)]
pub struct RunningHeaders {
    anchor: Regex,
    phrases: Vec<String>,
    continued_marker: String,
    block_size: usize,
}

impl RunningHeaders {
    /// Creates a stripper.
    ///
    /// `anchor` marks the first token of each banner block. `phrases` are
    /// exact boilerplate texts, and any token containing
    /// `continued_marker` is boilerplate too.
    #[must_use]
    pub const fn new(
        anchor: Regex,
        phrases: Vec<String>,
        continued_marker: String,
        block_size: usize,
    ) -> Self {
        Self {
            anchor,
            phrases,
            continued_marker,
            block_size,
        }
    }

    /// Returns `true` if `text` is banner boilerplate.
    #[must_use]
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| phrase == text)
            || TextMatch::Regex(&self.anchor).matches(text)
            || (!self.continued_marker.is_empty() && text.contains(&self.continued_marker))
    }

    /// Removes every banner block from `tokens`.
    ///
    /// A stream without any anchor is returned unchanged.
    #[must_use]
    pub fn strip(&self, tokens: Vec<Token>) -> Vec<Token> {
        let anchors = matching_indices(&tokens, &TextMatch::Regex(&self.anchor));
        if anchors.is_empty() {
            return tokens;
        }

        let mut remove = vec![false; tokens.len()];
        for anchor in anchors {
            let end = (anchor + self.block_size).min(tokens.len());
            for (index, token) in tokens.iter().enumerate().take(end).skip(anchor) {
                if self.is_boilerplate(&token.text) {
                    log::debug!("Stripping running header token '{}'", token.text);
                    remove[index] = true;
                }
            }
        }

        tokens
            .into_iter()
            .zip(remove)
            .filter_map(|(token, removed)| (!removed).then_some(token))
            .collect()
    }
}
