//! Unicode Line Breaking Algorithm (UAX #14) support.
//!
//! Wraps the `unicode-linebreak` crate and splits text into unbreakable
//! runs: the pieces between two break opportunities. Min-content sizing
//! uses the widest run, wrapping fills lines run by run.
//!
//! # References
//!
//! - Unicode Line Breaking Algorithm (UAX #14): <https://www.unicode.org/reports/tr14/>
//! - CSS Text Module Level 3: <https://www.w3.org/TR/css-text-3/>

use unicode_linebreak::{linebreaks, BreakOpportunity as UnicodeBreakOp};

/// The kind of break opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Mandatory break (newline, paragraph separator, end of text).
    Mandatory,
    /// Optional break opportunity (soft break).
    Allowed,
}

/// A break opportunity in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakOpportunity {
    /// Byte offset where the break can occur (break happens BEFORE this offset).
    pub offset: usize,
    /// Kind of break opportunity.
    pub kind: BreakKind,
}

/// Get all break opportunities in the text.
///
/// The end of non-empty text is always reported as a mandatory break.
pub fn break_opportunities(text: &str) -> impl Iterator<Item = BreakOpportunity> + '_ {
    linebreaks(text).map(|(offset, op)| BreakOpportunity {
        offset,
        kind: match op {
            UnicodeBreakOp::Mandatory => BreakKind::Mandatory,
            UnicodeBreakOp::Allowed => BreakKind::Allowed,
        },
    })
}

/// Text between two consecutive break opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRun<'a> {
    /// The full run, including trailing spaces and break characters.
    pub text: &'a str,
    /// Start byte offset in the source string.
    pub start: usize,
    /// Whether a mandatory break follows this run.
    pub mandatory_break: bool,
}

impl<'a> TextRun<'a> {
    /// The run without hanging whitespace, zero-width spaces or break
    /// characters. This is the part that must fit on a line.
    pub fn content(&self) -> &'a str {
        self.text
            .trim_end_matches(|c: char| c.is_whitespace() || is_zero_width_space(c))
    }

    /// The run without its trailing break characters. This is how far the
    /// run advances the pen.
    pub fn advance_text(&self) -> &'a str {
        self.text.trim_end_matches(is_mandatory_break)
    }

    /// End byte offset (exclusive).
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Split text into unbreakable runs.
///
/// ```
/// use rustkit_text::line_break::unbreakable_runs;
///
/// let runs: Vec<_> = unbreakable_runs("Hello big world").iter().map(|r| r.content()).collect();
/// assert_eq!(runs, vec!["Hello", "big", "world"]);
/// ```
pub fn unbreakable_runs(text: &str) -> Vec<TextRun<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;

    for op in break_opportunities(text) {
        if op.offset <= start {
            continue;
        }
        runs.push(TextRun {
            text: &text[start..op.offset],
            start,
            mandatory_break: op.kind == BreakKind::Mandatory,
        });
        start = op.offset;
    }

    runs
}

/// Check if a character is a mandatory break character.
pub fn is_mandatory_break(c: char) -> bool {
    matches!(
        c,
        '\n'        // LINE FEED
        | '\r'      // CARRIAGE RETURN
        | '\u{000B}' // VERTICAL TAB
        | '\u{000C}' // FORM FEED
        | '\u{0085}' // NEXT LINE
        | '\u{2028}' // LINE SEPARATOR
        | '\u{2029}' // PARAGRAPH SEPARATOR
    )
}

/// Check if a character is a zero-width space (potential break point).
pub fn is_zero_width_space(c: char) -> bool {
    c == '\u{200B}' // ZERO WIDTH SPACE
}
