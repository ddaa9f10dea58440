//! Typeahead suggestions for the search box.

use std::fmt;

use crate::catalog::Record;
use crate::search::{is_loose_match, normalize, normalize_query};

pub const DEFAULT_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Name,
    Cuisine,
    Food,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Name => "name",
            SuggestionKind::Cuisine => "cuisine",
            SuggestionKind::Food => "food",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}

/// Collect distinct field values that loosely match `query`.
///
/// Records are scanned in catalog order, checking name, cuisine and food type.
/// A value seen twice keeps its first position and takes the later kind.
pub fn suggestions(catalog: &[Record], query: &str, limit: usize) -> Vec<Suggestion> {
    let Some(normalized) = normalize_query(query) else {
        return Vec::new();
    };

    let mut found: Vec<Suggestion> = Vec::new();
    for record in catalog {
        let fields = [
            (&record.name, SuggestionKind::Name),
            (&record.cuisine, SuggestionKind::Cuisine),
            (&record.food_type, SuggestionKind::Food),
        ];
        for (text, kind) in fields {
            if !is_loose_match(&normalized, &normalize(text)) {
                continue;
            }
            match found.iter_mut().find(|s| s.text == *text) {
                Some(existing) => existing.kind = kind,
                None => found.push(Suggestion {
                    text: text.clone(),
                    kind,
                }),
            }
        }
    }

    found.truncate(limit);
    found
}
