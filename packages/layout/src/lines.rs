//! Clustering tokens into visual lines.
//!
//! Words on the same printed line rarely share an exact vertical position,
//! so lines are found with a tolerance window anchored on the lowest `y`
//! not yet claimed by a line. Keys that fall inside an earlier window are
//! synonyms of that line and never open one of their own.

use phl_courts_layout_models::Token;

/// Default vertical tolerance for grouping docket rows.
pub const DEFAULT_LINE_TOLERANCE: f64 = 3.0;

/// Tokens that share a visual line, sorted left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// The vertical key this line was collected under.
    pub y: f64,
    /// Member tokens in ascending `x`.
    pub tokens: Vec<Token>,
}

impl Line {
    /// The leftmost token. Lines produced by [`group_into_lines`] are never
    /// empty.
    #[must_use]
    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// Token texts, left to right.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// The line rendered as space-joined text.
    #[must_use]
    pub fn text(&self) -> String {
        self.texts().join(" ")
    }
}

/// Groups tokens into lines using a `tolerance` vertical window.
///
/// Tokens are swept in ascending `y`. The lowest unassigned token opens a
/// line keyed on its `y`, and every unassigned token within `tolerance` of
/// that key joins it. No token lands in more than one line, and any two
/// members of a line are at most `tolerance` apart.
///
/// Lines come back in ascending `y`. Within a line tokens are ordered by
/// `x`, with input order breaking ties. Empty input yields no lines.
#[must_use]
pub fn group_into_lines(tokens: &[Token], tolerance: f64) -> Vec<Line> {
    let mut order: Vec<usize> = (0..tokens.len()).collect();
    order.sort_by(|&a, &b| tokens[a].y.total_cmp(&tokens[b].y).then(a.cmp(&b)));

    let mut lines = Vec::new();
    let mut start = 0;

    while start < order.len() {
        let key = tokens[order[start]].y;
        let window = order[start..].partition_point(|&i| tokens[i].y <= key + tolerance);
        let end = start + window.max(1);

        let mut members = order[start..end].to_vec();
        members.sort_by(|&a, &b| tokens[a].x.total_cmp(&tokens[b].x).then(a.cmp(&b)));

        lines.push(Line {
            y: key,
            tokens: members.iter().map(|&i| tokens[i].clone()).collect(),
        });
        start = end;
    }

    lines
}

/// Partitions tokens by an exact attribute value.
///
/// Partitions appear in order of first appearance and keep input order
/// internally. Used where rows share a coordinate exactly, such as column
/// header rows or the stacked label columns of the defendant header.
pub fn partition_by<K: PartialEq>(
    tokens: &[Token],
    key: impl Fn(&Token) -> K,
) -> Vec<(K, Vec<Token>)> {
    let mut groups: Vec<(K, Vec<Token>)> = Vec::new();

    for token in tokens {
        let k = key(token);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(token.clone()),
            None => groups.push((k, vec![token.clone()])),
        }
    }

    groups
}
