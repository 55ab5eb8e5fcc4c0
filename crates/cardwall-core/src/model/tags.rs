//! Free-text tag lists.
//!
//! The backend stores tags as one comma-joined string on older cards and as a
//! JSON array on newer ones. Both shapes deserialize into a trimmed list.

use serde::{Deserialize, Deserializer};

/// The web form writes a single space when the tag field is left blank.
const BLANK_PLACEHOLDER: &str = " ";

/// Parse a comma-joined tag string into a list.
///
/// Entries are trimmed and empty entries are dropped. The blank-space
/// placeholder yields no tags.
#[must_use]
pub fn parse(raw: &str) -> Vec<String> {
    if raw == BLANK_PLACEHOLDER {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into the comma-joined wire form.
#[must_use]
pub fn join(tags: &[String]) -> String {
    tags.join(",")
}

/// Normalize a list of user-entered tags, accepting comma-joined entries.
#[must_use]
pub fn normalize<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries.iter().flat_map(|entry| parse(entry.as_ref())).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawTags::Joined(raw)) => parse(&raw),
        Some(RawTags::List(list)) => normalize(&list),
    })
}
