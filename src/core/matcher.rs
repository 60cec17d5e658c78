use std::ops::Range;

/// The three display parts of a candidate: text before the first match,
/// the matched text in the candidate's own casing, and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub prefix: &'a str,
    pub matched: &'a str,
    pub suffix: &'a str,
}

impl<'a> Highlight<'a> {
    pub fn plain(candidate: &'a str) -> Self {
        Self {
            prefix: candidate,
            matched: "",
            suffix: "",
        }
    }

    pub fn has_match(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Finds the first case-insensitive occurrence of `needle` in `haystack`.
///
/// The search is literal: characters such as `.`, `*` or `(` have no special
/// meaning. Comparison happens on lowercased characters, and the returned byte
/// range always lies on `haystack` char boundaries so it can be sliced to get
/// the original casing back. An empty needle never matches.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    let folded_needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();

    for (start, _) in haystack.char_indices() {
        if let Some(end) = match_at(haystack, start, &folded_needle) {
            return Some(start..end);
        }
    }
    None
}

fn match_at(haystack: &str, start: usize, folded_needle: &[char]) -> Option<usize> {
    let mut consumed = 0usize;
    for (offset, ch) in haystack[start..].char_indices() {
        for lower in ch.to_lowercase() {
            if folded_needle.get(consumed) != Some(&lower) {
                return None;
            }
            consumed += 1;
        }
        if consumed == folded_needle.len() {
            return Some(start + offset + ch.len_utf8());
        }
    }
    None
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Candidates containing `query`, in their original relative order.
/// An empty query yields nothing.
pub fn filter(candidates: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .filter(|candidate| contains_ignore_case(candidate, query))
        .cloned()
        .collect()
}

/// Splits `candidate` around the first occurrence of `query`.
pub fn highlight<'a>(candidate: &'a str, query: &str) -> Highlight<'a> {
    match find_ignore_case(candidate, query) {
        Some(range) => Highlight {
            prefix: &candidate[..range.start],
            matched: &candidate[range.clone()],
            suffix: &candidate[range.end..],
        },
        None => Highlight::plain(candidate),
    }
}
