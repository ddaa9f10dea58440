use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a string into a comparison key.
/// Lowercases, strips diacritics and drops everything that is not an
/// ASCII letter or digit (e.g., "Café François" -> "cafefrancois").
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(normalize(trimmed))
    }
}

/// Typo-tolerant match between two already-normalized strings.
///
/// Accepts containment in either direction, otherwise allows a single
/// insertion, deletion or substitution. Transpositions cost two edits and
/// are rejected. An empty query is contained in everything and matches.
pub fn is_loose_match(query: &str, candidate: &str) -> bool {
    if candidate.contains(query) || query.contains(candidate) {
        return true;
    }

    if query.len().abs_diff(candidate.len()) > 1 {
        return false;
    }

    let (short, long) = if query.len() <= candidate.len() {
        (query.as_bytes(), candidate.as_bytes())
    } else {
        (candidate.as_bytes(), query.as_bytes())
    };

    let (mut i, mut j, mut edits) = (0usize, 0usize, 0usize);
    while i < short.len() && j < long.len() {
        if short[i] == long[j] {
            i += 1;
            j += 1;
            continue;
        }

        edits += 1;
        if edits > 1 {
            return false;
        }

        if short.len() == long.len() {
            i += 1;
        }
        j += 1;
    }

    // trailing insertion in the longer string
    edits += long.len() - j;
    edits <= 1
}
