//! Normalization of free-form labels into field names.
//!
//! `"Sentence Dt."` becomes `"sentence_dt"`, `"Next Action  Room"` becomes
//! `"next_action_room"`.

use std::collections::BTreeMap;

/// Characters removed from keys unless configured otherwise.
pub const DEFAULT_PUNCTUATION: &[&str] = &["."];

/// Strips `punctuation`, lowercases, and joins whitespace runs with `_`.
#[must_use]
pub fn normalize_key<P: AsRef<str>>(key: &str, punctuation: &[P]) -> String {
    let mut key = key.to_owned();
    for p in punctuation {
        let p = p.as_ref();
        if !p.is_empty() {
            key = key.replace(p, "");
        }
    }
    key.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Normalizes every key of a mapping. When two keys collide after
/// normalization the later one wins.
pub fn normalize_keys<K, V, P>(
    map: impl IntoIterator<Item = (K, V)>,
    punctuation: &[P],
) -> BTreeMap<String, V>
where
    K: AsRef<str>,
    P: AsRef<str>,
{
    map.into_iter()
        .map(|(key, value)| (normalize_key(key.as_ref(), punctuation), value))
        .collect()
}
