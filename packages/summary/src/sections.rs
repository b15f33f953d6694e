//! Slicing the token stream into report sections.
//!
//! Each section ("Active", "Closed", ...) starts at the first token equal
//! to its title and runs until the next section's title. Sections are
//! ordered by where they first appear, not by configuration order.

use phl_courts_layout::search::{TextMatch, find_line_number};
use phl_courts_summary_models::{DocketStatus, Token};

use crate::ParseError;
use crate::config::SummaryConfig;

/// A contiguous run of tokens belonging to one section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    /// The section, which becomes each docket's status.
    pub status: DocketStatus,
    /// Index of the section title within the document.
    pub start: usize,
    /// The section's tokens, title included.
    pub tokens: &'a [Token],
}

/// Locates every configured section and slices the document between
/// consecutive section starts.
///
/// # Errors
///
/// Returns [`ParseError::Layout`] if a section is missing under the
/// [`Missing::Raise`](phl_courts_layout::search::Missing::Raise) policy,
/// or [`ParseError::NoSections`] if no section title appears at all.
pub fn slice_sections<'a>(
    tokens: &'a [Token],
    config: &SummaryConfig,
) -> Result<Vec<Section<'a>>, ParseError> {
    let mut starts: Vec<(DocketStatus, usize)> = Vec::new();

    for &status in &config.sections {
        let found = find_line_number(
            tokens,
            &TextMatch::Equals(status.title()),
            config.missing_sections,
        )?;
        if let Some(start) = found {
            starts.push((status, start));
        }
    }

    if starts.is_empty() {
        return Err(ParseError::NoSections);
    }

    starts.sort_by_key(|&(_, start)| start);

    let sections = starts
        .iter()
        .enumerate()
        .map(|(i, &(status, start))| {
            let end = starts.get(i + 1).map_or(tokens.len(), |&(_, next)| next);
            Section {
                status,
                start,
                tokens: &tokens[start..end],
            }
        })
        .collect();

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use phl_courts_layout::search::Missing;

    use super::*;

    fn stream(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .zip(0_u8..)
            .map(|(text, y)| Token::new(10.0, f64::from(y), *text))
            .collect()
    }

    #[test]
    fn orders_sections_by_first_appearance() {
        let tokens = stream(&["Doe, John", "Closed", "a", "b", "Active", "c"]);

        let sections = slice_sections(&tokens, &SummaryConfig::default()).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].status, DocketStatus::Closed);
        assert_eq!(sections[0].tokens.len(), 3);
        assert_eq!(sections[1].status, DocketStatus::Active);
        assert_eq!(sections[1].start, 4);
        assert_eq!(sections[1].tokens.len(), 2);
    }

    #[test]
    fn missing_section_is_ignored_by_default() {
        let tokens = stream(&["Active", "a", "Closed", "b"]);
        let sections = slice_sections(&tokens, &SummaryConfig::default()).unwrap();
        assert!(sections.iter().all(|s| s.status != DocketStatus::Inactive));
    }

    #[test]
    fn missing_section_raises_when_strict() {
        let tokens = stream(&["Active", "a"]);
        let config = SummaryConfig {
            missing_sections: Missing::Raise,
            ..SummaryConfig::default()
        };
        let err = slice_sections(&tokens, &config).unwrap_err();
        assert!(matches!(err, ParseError::Layout(_)));
    }

    #[test]
    fn document_without_sections_is_an_error() {
        let tokens = stream(&["Court Summary", "Doe, John"]);
        let err = slice_sections(&tokens, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::NoSections));
    }
}
