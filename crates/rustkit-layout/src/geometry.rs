//! Geometry primitives shared by every layout mode.

use std::ops::{Add, Sub};

/// A physical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Get the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T: Copy> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    /// Build from main/cross values for the given main axis.
    pub fn from_main_cross(main_axis: Axis, main: T, cross: T) -> Self {
        match main_axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Size<U> {
        Size {
            width: f(self.width),
            height: f(self.height),
        }
    }
}

impl Size<f32> {
    pub const ZERO: Size<f32> = Size {
        width: 0.0,
        height: 0.0,
    };
}

impl Size<Option<f32>> {
    pub const NONE: Size<Option<f32>> = Size {
        width: None,
        height: None,
    };

    /// Fill missing values from `other`.
    pub fn or(self, other: Size<Option<f32>>) -> Self {
        Size {
            width: self.width.or(other.width),
            height: self.height.or(other.height),
        }
    }

    /// Subtract `amount` from each definite value, flooring at zero.
    pub fn shrink(self, amount: Size<f32>) -> Self {
        Size {
            width: self.width.map(|w| (w - amount.width).max(0.0)),
            height: self.height.map(|h| (h - amount.height).max(0.0)),
        }
    }
}

/// The space a box may occupy along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvailableSpace {
    /// A definite amount in pixels.
    Definite(f32),
    /// Lay out as narrow as the content allows.
    MinContent,
    /// Lay out without any soft wrapping.
    MaxContent,
}

impl AvailableSpace {
    pub fn definite(self) -> Option<f32> {
        match self {
            AvailableSpace::Definite(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_definite(self) -> bool {
        matches!(self, AvailableSpace::Definite(_))
    }

    /// Take `amount` away from a definite value.
    pub fn shrink(self, amount: f32) -> Self {
        match self {
            AvailableSpace::Definite(value) => AvailableSpace::Definite((value - amount).max(0.0)),
            other => other,
        }
    }

    /// A definite value, or max-content when there is none.
    pub fn from_option(value: Option<f32>) -> Self {
        value.map_or(AvailableSpace::MaxContent, AvailableSpace::Definite)
    }

    /// The width that line filling should respect.
    pub fn as_wrap_width(self) -> f32 {
        match self {
            AvailableSpace::Definite(value) => value,
            AvailableSpace::MinContent => 0.0,
            AvailableSpace::MaxContent => f32::INFINITY,
        }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Edge sizes (margin, padding, border).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Sum of both edges along `axis`.
    pub fn sum(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Left or top edge.
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Right or bottom edge.
    pub fn end(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    pub fn set_start(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.left = value,
            Axis::Vertical => self.top = value,
        }
    }

    pub fn set_end(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.right = value,
            Axis::Vertical => self.bottom = value,
        }
    }

    /// Both sums as a size.
    pub fn sums(&self) -> Size<f32> {
        Size::new(self.horizontal(), self.vertical())
    }
}

impl Add for EdgeSizes {
    type Output = EdgeSizes;

    fn add(self, rhs: EdgeSizes) -> EdgeSizes {
        EdgeSizes {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

impl Sub for Size<f32> {
    type Output = Size<f32>;

    fn sub(self, rhs: Size<f32>) -> Size<f32> {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// Final geometry of one box.
///
/// `x`/`y` locate the border box relative to the parent's content-box
/// origin. `content_size` is the scrollable overflow extent measured from
/// the border-box origin, never smaller than the border box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryResult {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub content_size: Size<f32>,
}

impl GeometryResult {
    pub fn border_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Replace every non-finite component with zero.
    pub fn sanitized(self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        let width = finite(self.width).max(0.0);
        let height = finite(self.height).max(0.0);
        Self {
            x: finite(self.x),
            y: finite(self.y),
            width,
            height,
            content_size: Size::new(
                finite(self.content_size.width).max(width),
                finite(self.content_size.height).max(height),
            ),
        }
    }
}
