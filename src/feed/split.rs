//! Grapheme-safe payload splitting.

use unicode_segmentation::UnicodeSegmentation;

/// Split `text` into pieces of at most `max_bytes` bytes.
///
/// Pieces end on grapheme cluster boundaries. A single grapheme longer than
/// `max_bytes` becomes its own piece. Empty input yields no pieces.
///
/// ```
/// use flywheel_stream::feed::split_graphemes;
///
/// assert_eq!(split_graphemes("héllo", 3), vec!["hé", "llo"]);
/// ```
pub fn split_graphemes(text: &str, max_bytes: usize) -> Vec<&str> {
    let max_bytes = max_bytes.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for (offset, grapheme) in text.grapheme_indices(true) {
        if offset + grapheme.len() - start > max_bytes && end > start {
            pieces.push(&text[start..end]);
            start = end;
        }
        end = offset + grapheme.len();
    }
    if end > start {
        pieces.push(&text[start..end]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_ascii() {
        assert_eq!(split_graphemes("abcdef", 2), vec!["ab", "cd", "ef"]);
        assert_eq!(split_graphemes("abc", 10), vec!["abc"]);
        assert!(split_graphemes("", 4).is_empty());
    }

    #[test]
    fn test_split_keeps_clusters_whole() {
        // "e" + combining acute accent is one grapheme of three bytes.
        let text = "ae\u{301}b";
        assert_eq!(split_graphemes(text, 2), vec!["a", "e\u{301}", "b"]);
    }

    #[test]
    fn test_oversized_grapheme_alone() {
        let emoji = "👩‍👩‍👧";
        assert_eq!(split_graphemes(&format!("a{emoji}b"), 4), vec!["a", emoji, "b"]);
    }

    proptest! {
        #[test]
        fn pieces_rejoin_to_input(text in "\\PC{0,64}", max in 1usize..16) {
            let pieces = split_graphemes(&text, max);
            prop_assert_eq!(pieces.concat(), text.clone());
            for piece in &pieces {
                prop_assert!(piece.len() <= max || piece.graphemes(true).count() == 1);
            }
        }
    }
}
