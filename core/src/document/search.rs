//! Literal substring search in char offsets.

use crate::model::{ElementId, Match};

/// Byte index of the `offset`-th char, or `text.len()` when `offset` is at or past the end.
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(idx, _)| idx)
}

/// Chars `[start, end_inclusive]` of `text`, clamped to its length.
pub fn slice_chars(text: &str, start: usize, end_inclusive: usize) -> &str {
    let from = byte_offset(text, start);
    let to = byte_offset(text, end_inclusive.saturating_add(1));
    if from >= to { "" } else { &text[from..to] }
}

/// First occurrence of `pattern` in `text` starting at char `from`,
/// returned as `(start, end_inclusive)` char offsets.
pub fn find_in_text(text: &str, pattern: &str, from: usize) -> Option<(usize, usize)> {
    if pattern.is_empty() {
        return None;
    }
    let from_byte = byte_offset(text, from);
    let found = text[from_byte..].find(pattern)?;
    let start = from + text[from_byte..from_byte + found].chars().count();
    let end_inclusive = start + pattern.chars().count() - 1;
    Some((start, end_inclusive))
}

/// Every non-overlapping occurrence of `pattern` in `text`, left to right,
/// as `(start, end_inclusive)` char offsets. One pass over `text`.
pub fn find_all_in_text(text: &str, pattern: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    if pattern.is_empty() {
        return spans;
    }
    let pattern_chars = pattern.chars().count();
    let mut byte = 0;
    let mut chars = 0;
    while let Some(found) = text[byte..].find(pattern) {
        let start = chars + text[byte..byte + found].chars().count();
        spans.push((start, start + pattern_chars - 1));
        byte += found + pattern.len();
        chars = start + pattern_chars;
    }
    spans
}

/// Where the next search begins: the start of the document, or the char
/// right after the previous match in the same element.
pub fn resume_point(after: Option<&Match>) -> (usize, usize) {
    match after {
        None => (0, 0),
        Some(prev) => (prev.element.0, prev.end_inclusive + 1),
    }
}

/// Scans elements in document order. `text_of` returns `None` for elements
/// without editable text, which are skipped.
pub fn find_next_in<F, S>(
    element_count: usize,
    mut text_of: F,
    pattern: &str,
    after: Option<&Match>,
) -> Option<Match>
where
    F: FnMut(ElementId) -> Option<S>,
    S: AsRef<str>,
{
    let (first_element, mut from) = resume_point(after);
    for index in first_element..element_count {
        let element = ElementId(index);
        if let Some(text) = text_of(element) {
            if let Some((start, end_inclusive)) = find_in_text(text.as_ref(), pattern, from) {
                return Some(Match {
                    element,
                    start,
                    end_inclusive,
                });
            }
        }
        from = 0;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_text_counts_chars_not_bytes() {
        assert_eq!(find_in_text("héllo wörld", "wörld", 0), Some((6, 10)));
        assert_eq!(find_in_text("日本語の日本", "日本", 1), Some((4, 5)));
    }

    #[test]
    fn test_find_in_text_resumes_after_offset() {
        assert_eq!(find_in_text("cat dog cat", "cat", 0), Some((0, 2)));
        assert_eq!(find_in_text("cat dog cat", "cat", 3), Some((8, 10)));
        assert_eq!(find_in_text("cat dog cat", "cat", 11), None);
        assert_eq!(find_in_text("cat", "cat", 50), None);
    }

    #[test]
    fn test_find_all_in_text_is_non_overlapping() {
        assert_eq!(
            find_all_in_text("cat dog cat cat", "cat"),
            vec![(0, 2), (8, 10), (12, 14)]
        );
        assert_eq!(find_all_in_text("aaaaa", "aa"), vec![(0, 1), (2, 3)]);
        assert_eq!(find_all_in_text("日本語の日本", "日本"), vec![(0, 1), (4, 5)]);
        assert!(find_all_in_text("cat", "").is_empty());
        assert!(find_all_in_text("cat", "dog").is_empty());
    }

    #[test]
    fn test_find_in_text_empty_pattern() {
        assert_eq!(find_in_text("anything", "", 0), None);
    }

    #[test]
    fn test_slice_chars_clamps() {
        assert_eq!(slice_chars("hello world", 6, 10), "world");
        assert_eq!(slice_chars("hello", 3, 99), "lo");
        assert_eq!(slice_chars("hello", 9, 12), "");
        assert_eq!(slice_chars("naïve", 2, 2), "ï");
    }

    #[test]
    fn test_find_next_in_skips_elements_without_text() {
        let texts = [Some("no match"), None, Some("a cat here")];
        let found = find_next_in(
            texts.len(),
            |id| texts[id.0].map(str::to_string),
            "cat",
            None,
        );
        assert_eq!(
            found,
            Some(Match {
                element: ElementId(2),
                start: 2,
                end_inclusive: 4
            })
        );
    }

    #[test]
    fn test_find_next_in_moves_to_next_element_from_start() {
        let texts = ["cat", "cat"];
        let first = Match {
            element: ElementId(0),
            start: 0,
            end_inclusive: 2,
        };
        let found = find_next_in(
            texts.len(),
            |id| Some(texts[id.0].to_string()),
            "cat",
            Some(&first),
        );
        assert_eq!(found.map(|m| (m.element, m.start)), Some((ElementId(1), 0)));
    }
}
