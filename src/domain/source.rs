use std::fmt;

use serde::Serialize;

const LABELS: [&str; 4] = [
    "Common",
    "Finnish Patent and Registration Office",
    "Tax Administration",
    "Business Information System",
];

/// Human-readable provenance of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceLabel {
    /// A source id the registry documents.
    Known(&'static str),
    /// Any other source id, passed through unchanged.
    Unknown(i64),
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Known(label) => f.write_str(label),
            Self::Unknown(id) => write!(f, "{id}"),
        }
    }
}

/// Translates a registry source id into a human-readable label.
///
/// ```
/// use ytj::domain::source::{source_text, SourceLabel};
///
/// assert_eq!(source_text(2).to_string(), "Tax Administration");
/// assert_eq!(source_text(99), SourceLabel::Unknown(99));
/// ```
#[must_use]
pub fn source_text(source_id: i64) -> SourceLabel {
    usize::try_from(source_id)
        .ok()
        .and_then(|index| LABELS.get(index).copied())
        .map_or(SourceLabel::Unknown(source_id), SourceLabel::Known)
}
