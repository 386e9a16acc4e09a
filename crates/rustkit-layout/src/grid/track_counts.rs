//! Grid line coordinates.
//!
//! CSS numbers lines from 1, and negative numbers count back from the end
//! of the explicit grid. Placement works in origin-zero lines instead: the
//! first explicit line is 0, lines before it are negative. Track vectors
//! start at the first implicit track, so a line's index is its origin-zero
//! value plus the number of negative implicit tracks.

use std::fmt;

/// A line in origin-zero coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct OriginZeroLine(pub i32);

impl OriginZeroLine {
    pub fn offset(self, tracks: i32) -> Self {
        OriginZeroLine(self.0 + tracks)
    }
}

impl fmt::Display for OriginZeroLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-open run of tracks between two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LineSpan {
    pub start: OriginZeroLine,
    pub end: OriginZeroLine,
}

impl LineSpan {
    pub fn new(start: OriginZeroLine, end: OriginZeroLine) -> Self {
        Self { start, end }
    }

    /// `span` tracks starting at `start`.
    pub fn from_start(start: OriginZeroLine, span: u16) -> Self {
        Self::new(start, start.offset(i32::from(span)))
    }

    pub fn span(&self) -> u16 {
        u16::try_from((self.end.0 - self.start.0).max(0)).unwrap_or(u16::MAX)
    }

    pub fn lines(&self) -> std::ops::Range<i32> {
        self.start.0..self.end.0
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Track counts along one axis of the implicit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TrackCounts {
    /// Implicit tracks before the explicit grid.
    pub negative_implicit: u16,
    pub explicit: u16,
    /// Implicit tracks after the explicit grid.
    pub positive_implicit: u16,
}

impl TrackCounts {
    pub fn from_explicit(explicit: u16) -> Self {
        Self {
            negative_implicit: 0,
            explicit,
            positive_implicit: 0,
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.negative_implicit) + usize::from(self.explicit) + usize::from(self.positive_implicit)
    }

    /// First line of the implicit grid.
    pub fn implicit_start_line(&self) -> OriginZeroLine {
        OriginZeroLine(-i32::from(self.negative_implicit))
    }

    /// Last line of the implicit grid.
    pub fn implicit_end_line(&self) -> OriginZeroLine {
        OriginZeroLine(i32::from(self.explicit) + i32::from(self.positive_implicit))
    }

    /// Translate a CSS line number. `0` is not a line and yields `None`.
    pub fn css_to_origin_zero(&self, line: i32) -> Option<OriginZeroLine> {
        match line {
            0 => None,
            line if line > 0 => Some(OriginZeroLine(line - 1)),
            line => Some(OriginZeroLine(i32::from(self.explicit) + 1 + line)),
        }
    }

    /// Index of `line` in a vector of lines, if it is inside the grid.
    pub fn line_index(&self, line: OriginZeroLine) -> Option<usize> {
        let index = line.0 + i32::from(self.negative_implicit);
        usize::try_from(index).ok().filter(|&index| index <= self.len())
    }

    /// Index of the track that starts at `line`, if it is inside the grid.
    pub fn track_index(&self, line: OriginZeroLine) -> Option<usize> {
        self.line_index(line).filter(|&index| index < self.len())
    }

    /// Origin-zero line at a line index.
    pub fn line_at(&self, index: usize) -> OriginZeroLine {
        OriginZeroLine(i32::try_from(index).unwrap_or(i32::MAX) - i32::from(self.negative_implicit))
    }

    /// Grow the implicit grid so that `span` fits.
    pub fn include(&mut self, span: LineSpan) {
        let before = -span.start.0;
        if before > i32::from(self.negative_implicit) {
            self.negative_implicit = u16::try_from(before).unwrap_or(u16::MAX);
        }
        let after = span.end.0 - i32::from(self.explicit);
        if after > i32::from(self.positive_implicit) {
            self.positive_implicit = u16::try_from(after).unwrap_or(u16::MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_line_translation() {
        let counts = TrackCounts::from_explicit(3);
        assert_eq!(counts.css_to_origin_zero(1), Some(OriginZeroLine(0)));
        assert_eq!(counts.css_to_origin_zero(4), Some(OriginZeroLine(3)));
        // -1 is the last explicit line
        assert_eq!(counts.css_to_origin_zero(-1), Some(OriginZeroLine(3)));
        assert_eq!(counts.css_to_origin_zero(-4), Some(OriginZeroLine(0)));
        assert_eq!(counts.css_to_origin_zero(-5), Some(OriginZeroLine(-1)));
        assert_eq!(counts.css_to_origin_zero(0), None);
    }

    #[test]
    fn test_include_grows_both_ends() {
        let mut counts = TrackCounts::from_explicit(2);
        counts.include(LineSpan::new(OriginZeroLine(-2), OriginZeroLine(1)));
        counts.include(LineSpan::new(OriginZeroLine(1), OriginZeroLine(5)));
        assert_eq!(
            counts,
            TrackCounts {
                negative_implicit: 2,
                explicit: 2,
                positive_implicit: 3
            }
        );
        assert_eq!(counts.len(), 7);
        assert_eq!(counts.implicit_start_line(), OriginZeroLine(-2));
        assert_eq!(counts.implicit_end_line(), OriginZeroLine(5));
    }

    #[test]
    fn test_indices_follow_negative_implicit() {
        let counts = TrackCounts {
            negative_implicit: 1,
            explicit: 2,
            positive_implicit: 0,
        };
        // css line n maps to index n + negative_implicit - 1
        let line = counts.css_to_origin_zero(2).unwrap();
        assert_eq!(counts.line_index(line), Some(2));
        assert_eq!(counts.track_index(OriginZeroLine(2)), None);
        assert_eq!(counts.line_index(OriginZeroLine(2)), Some(3));
        assert_eq!(counts.line_at(0), OriginZeroLine(-1));
    }

    #[test]
    fn test_line_span() {
        let span = LineSpan::from_start(OriginZeroLine(-1), 3);
        assert_eq!(span.end, OriginZeroLine(2));
        assert_eq!(span.span(), 3);
        assert_eq!(format!("{}", span), "[-1, 2)");
    }
}
