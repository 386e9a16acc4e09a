//! Grapheme cluster segmentation.
//!
//! A grapheme cluster is what a user perceives as a single character. This can be:
//! - A single Unicode scalar value (like 'A')
//! - Multiple scalars (like 'é' = 'e' + combining acute accent)
//! - Complex emoji sequences (like 👨‍👩‍👧 = family emoji)
//!
//! The approximate measurer advances the pen once per cluster.
//!
//! # References
//!
//! - Unicode Text Segmentation (UAX #29): <https://www.unicode.org/reports/tr29/>

use unicode_segmentation::UnicodeSegmentation;

use crate::line_break::{is_mandatory_break, is_zero_width_space};

/// A segment of text with its position in the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment<'a> {
    /// The segment text.
    pub text: &'a str,
    /// Start byte offset in the source string.
    pub start: usize,
}

impl<'a> TextSegment<'a> {
    /// Check if this cluster occupies no horizontal space (break characters
    /// and zero-width spaces).
    pub fn is_zero_width(&self) -> bool {
        self.text
            .chars()
            .all(|c| is_mandatory_break(c) || is_zero_width_space(c))
    }
}

/// Iterate over extended grapheme clusters with their byte offsets.
///
/// ```
/// use rustkit_text::segmentation::grapheme_indices;
///
/// let segments: Vec<_> = grapheme_indices("Héllo").collect();
/// assert_eq!(segments[1].text, "é");
/// ```
pub fn grapheme_indices(text: &str) -> impl Iterator<Item = TextSegment<'_>> {
    text.grapheme_indices(true)
        .map(|(start, text)| TextSegment { text, start })
}

/// Count the clusters that advance the pen.
pub fn visible_grapheme_count(text: &str) -> usize {
    grapheme_indices(text).filter(|g| !g.is_zero_width()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grapheme_indices_emoji() {
        let segments: Vec<_> = grapheme_indices("Hi👋").collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].text, "👋");
        assert_eq!(segments[2].start, 2);
    }

    #[test]
    fn test_combining_marks_form_one_cluster() {
        assert_eq!(grapheme_indices("e\u{0301}").count(), 1);
        assert_eq!(visible_grapheme_count("e\u{0301}x"), 2);
        assert_eq!(grapheme_indices("").count(), 0);
    }

    #[test]
    fn test_visible_grapheme_count() {
        assert_eq!(visible_grapheme_count("ab\u{200B}c"), 3);
        assert_eq!(visible_grapheme_count("ab\n"), 2);
        assert_eq!(visible_grapheme_count("a b"), 3);
    }
}
