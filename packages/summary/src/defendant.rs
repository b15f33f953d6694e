//! The defendant block at the top of the report.
//!
//! Between the report title and the first section the defendant's details
//! are printed in three stacked columns, each sharing one exact `x`:
//! name, location and aliases; date of birth; and `Key: Value`
//! demographics.

use phl_courts_layout::keys::normalize_key;
use phl_courts_layout::lines::partition_by;
use phl_courts_layout::search::{Missing, TextMatch, find_line_number};
use phl_courts_summary_models::Token;

use crate::ParseError;
use crate::config::SummaryConfig;

/// Defendant details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defendant {
    pub name: String,
    pub date_of_birth: String,
    pub eyes: String,
    pub sex: String,
    pub hair: String,
    pub race: String,
    pub location: String,
    pub aliases: Vec<String>,
}

/// Parses the defendant block.
///
/// # Errors
///
/// Returns [`ParseError::Layout`] if the report title or `first_section`
/// cannot be found, and [`ParseError::MissingDefendantField`] if the name,
/// location or date of birth column is absent.
pub fn parse_defendant(
    tokens: &[Token],
    first_section: &str,
    config: &SummaryConfig,
) -> Result<Defendant, ParseError> {
    let title_match = TextMatch::Equals(&config.report_title);
    let title = find_line_number(tokens, &title_match, Missing::Raise)?.unwrap_or_default();
    let end = find_line_number(tokens, &TextMatch::Equals(first_section), Missing::Raise)?
        .unwrap_or(tokens.len());
    let block = tokens.get(title + 1..end).unwrap_or_default();

    let mut columns = partition_by(block, |token| token.x);
    columns.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    let mut columns = columns.into_iter().map(|(_, members)| members);

    let identity = columns.next().unwrap_or_default();
    let birth = columns.next().unwrap_or_default();
    let demographics = columns.next().unwrap_or_default();

    let required = |index: usize, field: &str| {
        identity
            .get(index)
            .map(|token| token.text.trim().to_owned())
            .ok_or_else(|| ParseError::MissingDefendantField {
                field: field.to_owned(),
            })
    };

    let mut defendant = Defendant {
        name: required(0, "name")?,
        location: required(1, "location")?,
        aliases: identity
            .iter()
            .skip(3)
            .map(|token| token.text.trim().to_owned())
            .collect(),
        date_of_birth: birth
            .first()
            .and_then(|token| token.text.rsplit(':').next())
            .map(|dob| dob.trim().to_owned())
            .ok_or_else(|| ParseError::MissingDefendantField {
                field: "date_of_birth".to_owned(),
            })?,
        ..Defendant::default()
    };

    for token in &demographics {
        let Some((key, value)) = token.text.split_once(':') else {
            log::warn!("Skipping malformed defendant field '{}'", token.text);
            continue;
        };
        let value = value.trim().to_lowercase();
        match normalize_key(key, &config.key_punctuation).as_str() {
            "eyes" => defendant.eyes = value,
            "sex" => defendant.sex = value,
            "hair" => defendant.hair = value,
            "race" => defendant.race = value,
            other => log::debug!("Ignoring defendant field '{other}'"),
        }
    }

    Ok(defendant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_tokens() -> Vec<Token> {
        vec![
            Token::new(200.0, 10.0, "First Judicial District of Pennsylvania"),
            Token::new(250.0, 20.0, "Court Summary"),
            Token::new(30.0, 40.0, "Doe, John"),
            Token::new(300.0, 40.0, "DOB: 01/01/1980"),
            Token::new(450.0, 40.0, "Eyes: Brown"),
            Token::new(30.0, 50.0, "Philadelphia, PA 19107"),
            Token::new(450.0, 50.0, "Sex: Male"),
            Token::new(30.0, 60.0, "Aliases:"),
            Token::new(450.0, 60.0, "Hair: Black"),
            Token::new(30.0, 70.0, "Doe, Johnny"),
            Token::new(450.0, 70.0, "Race: White"),
            Token::new(30.0, 80.0, "Doe, J."),
            Token::new(30.0, 100.0, "Active"),
        ]
    }

    #[test]
    fn parses_three_columns() {
        let defendant =
            parse_defendant(&header_tokens(), "Active", &SummaryConfig::default()).unwrap();

        assert_eq!(defendant.name, "Doe, John");
        assert_eq!(defendant.location, "Philadelphia, PA 19107");
        assert_eq!(defendant.aliases, vec!["Doe, Johnny", "Doe, J."]);
        assert_eq!(defendant.date_of_birth, "01/01/1980");
        assert_eq!(defendant.eyes, "brown");
        assert_eq!(defendant.sex, "male");
        assert_eq!(defendant.hair, "black");
        assert_eq!(defendant.race, "white");
    }

    #[test]
    fn malformed_demographic_is_skipped() {
        let mut tokens = header_tokens();
        tokens.insert(10, Token::new(450.0, 75.0, "Unknown"));

        let defendant = parse_defendant(&tokens, "Active", &SummaryConfig::default()).unwrap();

        assert_eq!(defendant.race, "white");
    }

    #[test]
    fn missing_birth_column_is_an_error() {
        let tokens: Vec<Token> = header_tokens()
            .into_iter()
            .filter(|t| !t.text.starts_with("DOB") && !t.text.contains(": "))
            .collect();

        let err = parse_defendant(&tokens, "Active", &SummaryConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            ParseError::MissingDefendantField { ref field } if field == "date_of_birth"
        ));
    }

    #[test]
    fn missing_title_is_a_lookup_failure() {
        let tokens = vec![Token::new(30.0, 40.0, "Doe, John"), Token::new(30.0, 50.0, "Active")];
        let err = parse_defendant(&tokens, "Active", &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::Layout(_)));
    }
}
