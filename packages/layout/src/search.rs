//! Locating anchor text in a token stream.

use phl_courts_layout_models::Token;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// How a token's text is compared against the search pattern.
#[derive(Debug, Clone, Copy)]
pub enum TextMatch<'a> {
    /// The text equals the pattern exactly.
    Equals(&'a str),
    /// The text contains the pattern.
    Contains(&'a str),
    /// The regex matches at the start of the text.
    Regex(&'a Regex),
}

impl TextMatch<'_> {
    /// Tests a single token text.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Equals(pattern) => text == *pattern,
            Self::Contains(pattern) => text.contains(pattern),
            Self::Regex(re) => re.find(text).is_some_and(|m| m.start() == 0),
        }
    }

    fn pattern(&self) -> &str {
        match self {
            Self::Equals(pattern) | Self::Contains(pattern) => pattern,
            Self::Regex(re) => re.as_str(),
        }
    }
}

/// What to do when a search finds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Missing {
    /// Fail with [`LayoutError::LookupFailure`].
    #[default]
    Raise,
    /// Return an empty result.
    Ignore,
}

/// Returns the index of every token whose text matches.
#[must_use]
pub fn matching_indices(tokens: &[Token], how: &TextMatch<'_>) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| how.matches(&token.text))
        .map(|(i, _)| i)
        .collect()
}

/// Returns the index of every matching token, applying the `missing`
/// policy when there are none.
///
/// # Errors
///
/// Returns [`LayoutError::LookupFailure`] if nothing matches and `missing`
/// is [`Missing::Raise`].
pub fn find_line_numbers(
    tokens: &[Token],
    how: &TextMatch<'_>,
    missing: Missing,
) -> Result<Vec<usize>, LayoutError> {
    let found = matching_indices(tokens, how);

    if found.is_empty() {
        match missing {
            Missing::Raise => {
                return Err(LayoutError::LookupFailure {
                    text: how.pattern().to_owned(),
                });
            }
            Missing::Ignore => log::debug!("No token matches '{}', ignoring", how.pattern()),
        }
    }

    Ok(found)
}

/// Returns the index of the first matching token.
///
/// # Errors
///
/// Returns [`LayoutError::LookupFailure`] if nothing matches and `missing`
/// is [`Missing::Raise`].
pub fn find_line_number(
    tokens: &[Token],
    how: &TextMatch<'_>,
    missing: Missing,
) -> Result<Option<usize>, LayoutError> {
    Ok(find_line_numbers(tokens, how, missing)?.first().copied())
}
