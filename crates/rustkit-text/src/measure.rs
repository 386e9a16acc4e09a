//! Text measurement.
//!
//! [`TextMeasurer`] is the seam between layout and font shaping. Layout
//! only needs advance widths; everything else (runs, wrapping, intrinsic
//! widths) is computed here on top of that one query.

use crate::line_break::unbreakable_runs;
use crate::segmentation::visible_grapheme_count;
use crate::TextError;

/// Average advance as a fraction of the font size.
pub const DEFAULT_ADVANCE_RATIO: f32 = 0.5;

/// Measures the advance width of a piece of text.
pub trait TextMeasurer {
    /// Width of `text` set on a single line at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).text_width(text, font_size)
    }
}

/// Fixed-advance measurer: every visible grapheme is
/// `font_size * advance_ratio` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMeasurer {
    advance_ratio: f32,
}

impl Default for ApproximateMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: DEFAULT_ADVANCE_RATIO,
        }
    }
}

impl ApproximateMeasurer {
    pub fn new(advance_ratio: f32) -> Result<Self, TextError> {
        if !advance_ratio.is_finite() || advance_ratio < 0.0 {
            return Err(TextError::InvalidAdvance(advance_ratio));
        }
        Ok(Self { advance_ratio })
    }

    pub fn advance_ratio(&self) -> f32 {
        self.advance_ratio
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        visible_grapheme_count(text) as f32 * font_size * self.advance_ratio
    }
}

/// Result of filling lines greedily.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WrappedText {
    pub line_count: usize,
    /// Widest line, excluding hanging whitespace.
    pub max_line_width: f32,
}

impl WrappedText {
    fn push_line(&mut self, width: f32) {
        self.line_count += 1;
        self.max_line_width = self.max_line_width.max(width);
    }
}

#[derive(Default)]
struct OpenLine {
    advance: f32,
    visible: f32,
    open: bool,
}

/// Fill lines no wider than `available_width`, breaking only between runs.
///
/// A run wider than the line still gets a line of its own.
pub fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font_size: f32,
    available_width: f32,
) -> WrappedText {
    let runs = unbreakable_runs(text);
    let mut wrapped = WrappedText::default();
    let mut line = OpenLine::default();

    for (i, run) in runs.iter().enumerate() {
        let content = measurer.text_width(run.content(), font_size);
        let advance = measurer.text_width(run.advance_text(), font_size);

        if line.open && line.advance + content > available_width {
            wrapped.push_line(line.visible);
            line = OpenLine::default();
        }

        line.visible = line.advance + content;
        line.advance += advance;
        line.open = true;

        if run.mandatory_break && i + 1 < runs.len() {
            wrapped.push_line(line.visible);
            line = OpenLine::default();
        }
    }

    if line.open {
        wrapped.push_line(line.visible);
    }

    wrapped
}

/// Width of the widest unbreakable run.
pub fn min_content_width<M: TextMeasurer + ?Sized>(measurer: &M, text: &str, font_size: f32) -> f32 {
    unbreakable_runs(text)
        .iter()
        .map(|run| measurer.text_width(run.content(), font_size))
        .fold(0.0, f32::max)
}

/// Width of the widest line when only mandatory breaks wrap.
pub fn max_content_width<M: TextMeasurer + ?Sized>(measurer: &M, text: &str, font_size: f32) -> f32 {
    wrap_text(measurer, text, font_size, f32::INFINITY).max_line_width
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10px per visible grapheme at font size 20.
    fn measurer() -> ApproximateMeasurer {
        ApproximateMeasurer::default()
    }

    #[test]
    fn test_approximate_width() {
        assert_eq!(measurer().text_width("abcd", 20.0), 40.0);
        assert_eq!(measurer().text_width("ab\u{200B}", 20.0), 20.0);
        assert!(ApproximateMeasurer::new(f32::NAN).is_err());
        assert!(ApproximateMeasurer::new(-1.0).is_err());
    }

    #[test]
    fn test_min_content_is_longest_run() {
        assert_eq!(min_content_width(&measurer(), "aa bbbb c", 20.0), 40.0);
        assert_eq!(min_content_width(&measurer(), "", 20.0), 0.0);
    }

    #[test]
    fn test_max_content_is_single_line() {
        // "aa bbbb c" is 9 graphemes
        assert_eq!(max_content_width(&measurer(), "aa bbbb c", 20.0), 90.0);
        // trailing space hangs
        assert_eq!(max_content_width(&measurer(), "aa ", 20.0), 20.0);
        // widest line across mandatory breaks
        assert_eq!(max_content_width(&measurer(), "a\nbbb", 20.0), 30.0);
    }

    #[test]
    fn test_wrap_fills_lines_greedily() {
        let wrapped = wrap_text(&measurer(), "aa bb cc", 20.0, 50.0);
        // "aa bb" = 50 fits, "cc" wraps
        assert_eq!(wrapped.line_count, 2);
        assert_eq!(wrapped.max_line_width, 50.0);
    }

    #[test]
    fn test_wrap_at_zero_width_gives_one_run_per_line() {
        let wrapped = wrap_text(&measurer(), "aa bbb c", 20.0, 0.0);
        assert_eq!(wrapped.line_count, 3);
        assert_eq!(wrapped.max_line_width, 30.0);
    }

    #[test]
    fn test_wrap_counts_blank_lines() {
        let wrapped = wrap_text(&measurer(), "a\n\nb", 20.0, f32::INFINITY);
        assert_eq!(wrapped.line_count, 3);
        assert_eq!(wrap_text(&measurer(), "", 20.0, 100.0).line_count, 0);
    }
}
