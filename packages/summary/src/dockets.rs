//! Splitting a section into per-docket token groups.
//!
//! Every docket begins with its docket number token. A group runs until the
//! next token carrying a *different* docket number, so a number repeated
//! back to back (a page break inside one docket) stays in one group. A
//! number that reappears later, after other dockets, has already been
//! emitted; that later group is discarded and reported.

use std::collections::BTreeSet;

use phl_courts_layout::aligned;
use phl_courts_summary_models::Token;

use crate::ParseError;
use crate::config::{CountyResolution, SummaryConfig};
use crate::counties::county_for_docket;

/// The tokens of one docket.
#[derive(Debug, Clone, PartialEq)]
pub struct DocketGroup<'a> {
    /// The docket number that opens the group.
    pub docket_number: String,
    /// The resolved county.
    pub county: String,
    /// Tokens from the docket number up to the next distinct docket.
    pub tokens: &'a [Token],
}

/// A group dropped because its docket number was already emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardedGroup {
    /// The repeated docket number.
    pub docket_number: String,
    /// The dropped tokens.
    pub tokens: Vec<Token>,
}

/// The result of splitting one section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitDockets<'a> {
    /// Groups in document order, one per newly seen docket number.
    pub groups: Vec<DocketGroup<'a>>,
    /// Repeats that were skipped.
    pub discarded: Vec<DiscardedGroup>,
}

/// A docket number occurrence, with where its group boundary begins.
struct Occurrence<'a> {
    number: &'a str,
    index: usize,
    boundary: usize,
    label: Option<&'a str>,
}

/// Splits `tokens` into docket groups.
///
/// `seen` carries docket numbers already emitted by earlier sections, so
/// duplicates are detected across the whole document. Tokens before the
/// first docket number are not part of any group.
///
/// # Errors
///
/// Returns a county lookup error if a docket number's county cannot be
/// resolved.
pub fn split_dockets<'a>(
    tokens: &'a [Token],
    config: &SummaryConfig,
    seen: &mut BTreeSet<String>,
) -> Result<SplitDockets<'a>, ParseError> {
    let occurrences = locate(tokens, config);
    let mut split = SplitDockets::default();
    let mut previous_county: Option<String> = None;

    let mut i = 0;
    while i < occurrences.len() {
        let occurrence = &occurrences[i];

        let mut j = i + 1;
        while j < occurrences.len() && occurrences[j].number == occurrence.number {
            j += 1;
        }
        let end = occurrences.get(j).map_or(tokens.len(), |next| next.boundary);
        let slice = &tokens[occurrence.index..end];

        let county = resolve_county(occurrence, previous_county.as_deref(), config)?;
        previous_county = Some(county.clone());

        if seen.insert(occurrence.number.to_owned()) {
            split.groups.push(DocketGroup {
                docket_number: occurrence.number.to_owned(),
                county,
                tokens: slice,
            });
        } else {
            log::warn!(
                "Discarding {} tokens of repeated docket {}",
                slice.len(),
                occurrence.number
            );
            split.discarded.push(DiscardedGroup {
                docket_number: occurrence.number.to_owned(),
                tokens: slice.to_vec(),
            });
        }

        i = j;
    }

    Ok(split)
}

fn locate<'a>(tokens: &'a [Token], config: &SummaryConfig) -> Vec<Occurrence<'a>> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| config.is_docket_number(&token.text))
        .map(|(index, token)| {
            let label = match config.county_resolution {
                CountyResolution::Code => None,
                CountyResolution::AdjacentLabel => index
                    .checked_sub(1)
                    .map(|prev| &tokens[prev])
                    .filter(|prev| {
                        !config.is_docket_number(&prev.text)
                            && aligned(prev.x, token.x, config.label_x_tolerance)
                            && aligned(prev.y, token.y, config.label_y_tolerance)
                    })
                    .map(|prev| prev.text.as_str()),
            };
            Occurrence {
                number: token.text.as_str(),
                index,
                boundary: if label.is_some() { index - 1 } else { index },
                label,
            }
        })
        .collect()
}

fn resolve_county(
    occurrence: &Occurrence<'_>,
    previous: Option<&str>,
    config: &SummaryConfig,
) -> Result<String, ParseError> {
    match config.county_resolution {
        CountyResolution::Code => Ok(county_for_docket(occurrence.number)?.to_owned()),
        CountyResolution::AdjacentLabel => {
            if let Some(label) = occurrence.label {
                return Ok(label.to_owned());
            }
            if let Some(previous) = previous {
                return Ok(previous.to_owned());
            }
            log::debug!(
                "No county label above {}, falling back to its county code",
                occurrence.number
            );
            Ok(county_for_docket(occurrence.number)?.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(x: f64, y: f64, text: &str) -> Token {
        Token::new(x, y, text)
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_docket_numbers() {
        let tokens = vec![
            tok(30.0, 90.0, "Active"),
            tok(30.0, 100.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 110.0, "Seq No"),
            tok(30.0, 200.0, "CP-09-CR-0000002-2019"),
            tok(30.0, 210.0, "Seq No"),
        ];
        let mut seen = BTreeSet::new();

        let split = split_dockets(&tokens, &SummaryConfig::default(), &mut seen).unwrap();

        assert_eq!(split.groups.len(), 2);
        assert_eq!(split.groups[0].county, "Philadelphia");
        assert_eq!(texts(split.groups[0].tokens), vec!["MC-51-CR-0000001-2021", "Seq No"]);
        assert_eq!(split.groups[1].county, "Bucks");
        assert!(split.discarded.is_empty());
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn consecutive_repeats_stay_in_one_group() {
        let tokens = vec![
            tok(30.0, 100.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 110.0, "a"),
            tok(30.0, 700.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 710.0, "b"),
            tok(30.0, 800.0, "MC-51-CR-0000003-2021"),
        ];
        let mut seen = BTreeSet::new();

        let split = split_dockets(&tokens, &SummaryConfig::default(), &mut seen).unwrap();

        assert_eq!(split.groups.len(), 2);
        assert_eq!(split.groups[0].tokens.len(), 4);
        assert!(split.discarded.is_empty());
    }

    #[test]
    fn later_repeat_is_discarded() {
        let tokens = vec![
            tok(30.0, 100.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 110.0, "a"),
            tok(30.0, 200.0, "MC-51-CR-0000002-2021"),
            tok(30.0, 210.0, "b"),
            tok(30.0, 300.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 310.0, "c"),
        ];
        let mut seen = BTreeSet::new();

        let split = split_dockets(&tokens, &SummaryConfig::default(), &mut seen).unwrap();

        assert_eq!(split.groups.len(), 2);
        assert_eq!(split.discarded.len(), 1);
        assert_eq!(split.discarded[0].docket_number, "MC-51-CR-0000001-2021");
        assert_eq!(texts(&split.discarded[0].tokens), vec!["MC-51-CR-0000001-2021", "c"]);
    }

    #[test]
    fn repeats_across_sections_are_discarded() {
        let first = vec![tok(30.0, 100.0, "MC-51-CR-0000001-2021")];
        let second = vec![tok(30.0, 500.0, "MC-51-CR-0000001-2021")];
        let config = SummaryConfig::default();
        let mut seen = BTreeSet::new();

        split_dockets(&first, &config, &mut seen).unwrap();
        let split = split_dockets(&second, &config, &mut seen).unwrap();

        assert!(split.groups.is_empty());
        assert_eq!(split.discarded.len(), 1);
    }

    #[test]
    fn unknown_county_code_is_an_error() {
        let tokens = vec![tok(30.0, 100.0, "MC-88-CR-0000001-2021")];
        let err = split_dockets(&tokens, &SummaryConfig::default(), &mut BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::UnknownCountyCode { code: 88, .. }));
    }

    #[test]
    fn adjacent_label_resolves_county() {
        let tokens = vec![
            tok(30.0, 90.0, "Montgomery"),
            tok(30.2, 100.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 110.0, "a"),
            tok(30.0, 200.0, "MC-51-CR-0000002-2021"),
            tok(30.0, 210.0, "b"),
        ];
        let config = SummaryConfig {
            county_resolution: CountyResolution::AdjacentLabel,
            ..SummaryConfig::default()
        };

        let split = split_dockets(&tokens, &config, &mut BTreeSet::new()).unwrap();

        assert_eq!(split.groups[0].county, "Montgomery");
        assert_eq!(texts(split.groups[0].tokens), vec!["MC-51-CR-0000001-2021", "a"]);
        assert_eq!(split.groups[1].county, "Montgomery");
    }

    #[test]
    fn unlabeled_first_docket_falls_back_to_code() {
        let tokens = vec![
            tok(30.0, 100.0, "CP-09-CR-0000002-2019"),
            tok(30.0, 110.0, "a"),
            tok(30.0, 200.0, "MC-51-CR-0000001-2021"),
        ];
        let config = SummaryConfig {
            county_resolution: CountyResolution::AdjacentLabel,
            ..SummaryConfig::default()
        };

        let split = split_dockets(&tokens, &config, &mut BTreeSet::new()).unwrap();

        assert_eq!(split.groups[0].county, "Bucks");
        assert_eq!(split.groups[1].county, "Bucks");
    }

    #[test]
    fn label_shortens_previous_group() {
        let tokens = vec![
            tok(30.0, 100.0, "MC-51-CR-0000001-2021"),
            tok(30.0, 110.0, "a"),
            tok(30.0, 190.0, "Bucks"),
            tok(30.0, 200.0, "CP-09-CR-0000002-2019"),
        ];
        let config = SummaryConfig {
            county_resolution: CountyResolution::AdjacentLabel,
            ..SummaryConfig::default()
        };

        let split = split_dockets(&tokens, &config, &mut BTreeSet::new()).unwrap();

        assert_eq!(split.groups[0].county, "Philadelphia");
        assert_eq!(texts(split.groups[0].tokens), vec!["MC-51-CR-0000001-2021", "a"]);
        assert_eq!(split.groups[1].county, "Bucks");
    }
}
