//! Style resolution for one box: edges, preferred sizes and clamps.
//!
//! Every size produced here is a border-box size.

use rustkit_style::{BoxSizing, BoxStyle, Length, SizingFunction};

use crate::context::LayoutContext;
use crate::geometry::{Axis, EdgeSizes, Size};
use crate::intrinsic::{self, IntrinsicSizingMode};
use crate::tree::NodeId;

/// Which margins are `auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AutoMargins {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl AutoMargins {
    pub fn start(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    pub fn end(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    pub fn count(&self, axis: Axis) -> usize {
        usize::from(self.start(axis)) + usize::from(self.end(axis))
    }
}

/// Resolve margins. Percentages resolve against the containing block's width.
pub(crate) fn resolve_margins(style: &BoxStyle, percent_basis: Option<f32>) -> (EdgeSizes, AutoMargins) {
    let edges = EdgeSizes {
        top: style.margin_top.resolve(percent_basis),
        right: style.margin_right.resolve(percent_basis),
        bottom: style.margin_bottom.resolve(percent_basis),
        left: style.margin_left.resolve(percent_basis),
    };
    let auto = AutoMargins {
        top: style.margin_top.is_auto(),
        right: style.margin_right.is_auto(),
        bottom: style.margin_bottom.is_auto(),
        left: style.margin_left.is_auto(),
    };
    (edges, auto)
}

fn resolve_edges(top: Length, right: Length, bottom: Length, left: Length, basis: Option<f32>) -> EdgeSizes {
    EdgeSizes {
        top: top.resolve(basis).max(0.0),
        right: right.resolve(basis).max(0.0),
        bottom: bottom.resolve(basis).max(0.0),
        left: left.resolve(basis).max(0.0),
    }
}

/// Convert a specified size to a border-box size.
pub(crate) fn to_border_box(value: f32, box_sizing: BoxSizing, padding_border: f32) -> f32 {
    match box_sizing {
        BoxSizing::ContentBox => value.max(0.0) + padding_border,
        BoxSizing::BorderBox => value.max(padding_border),
    }
}

/// `fit-content(limit)`: the limit, but never below min-content or above max-content.
pub(crate) fn fit_content(min_content: f32, max_content: f32, limit: f32) -> f32 {
    max_content.min(min_content.max(limit))
}

/// Replace a non-finite value.
pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Edges and size constraints of one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedBox {
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
    /// Definite preferred size, if any.
    pub size: Size<Option<f32>>,
    /// `None` is `auto`.
    pub min_size: Size<Option<f32>>,
    /// `None` is unbounded.
    pub max_size: Size<Option<f32>>,
}

impl ResolvedBox {
    pub fn padding_border(&self) -> EdgeSizes {
        self.padding + self.border
    }

    /// Clamp by min/max (min wins) and by padding plus border.
    pub fn clamp(&self, axis: Axis, value: f32) -> f32 {
        let mut value = value;
        if let Some(max) = self.max_size.get(axis) {
            value = value.min(max);
        }
        if let Some(min) = self.min_size.get(axis) {
            value = value.max(min);
        }
        value.max(self.padding_border().sum(axis))
    }

    /// Definite content-box size.
    pub fn content_box_size(&self) -> Size<Option<f32>> {
        self.size.shrink(self.padding_border().sums())
    }
}

/// Resolve `node`'s box against its containing block.
///
/// `known` sizes come from the parent's algorithm and win over the style.
/// While `node` is being measured on an axis its own preferred size on that
/// axis is ignored, so measurement yields the content size.
pub(crate) fn resolve_box(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    parent_size: Size<Option<f32>>,
    known: Size<Option<f32>>,
) -> ResolvedBox {
    let tree = ctx.tree;
    let style = tree.style(node);
    let padding = resolve_edges(
        style.padding_top,
        style.padding_right,
        style.padding_bottom,
        style.padding_left,
        parent_size.width,
    );
    let border = resolve_edges(
        style.border_top_width,
        style.border_right_width,
        style.border_bottom_width,
        style.border_left_width,
        parent_size.width,
    );
    let pb = (padding + border).sums();

    let mut resolved = ResolvedBox {
        padding,
        border,
        size: Size::NONE,
        min_size: Size::NONE,
        max_size: Size::NONE,
    };

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (preferred, min, max) = match axis {
            Axis::Horizontal => (style.width, style.min_width, style.max_width),
            Axis::Vertical => (style.height, style.min_height, style.max_height),
        };
        let basis = parent_size.get(axis);
        let pb_axis = pb.get(axis);
        let box_sizing = style.box_sizing;

        let min = resolve_sizing(ctx, node, axis, min, basis, pb_axis, box_sizing);
        let max = resolve_sizing(ctx, node, axis, max, basis, pb_axis, box_sizing);
        resolved.min_size.set(axis, min);
        resolved.max_size.set(axis, max);

        let size = match known.get(axis) {
            Some(size) => Some(size),
            None if ctx.is_measuring(node, axis) => None,
            None => resolve_sizing(ctx, node, axis, preferred, basis, pb_axis, box_sizing)
                .map(|value| resolved.clamp(axis, value)),
        };
        resolved.size.set(axis, size);
    }

    resolved
}

fn resolve_sizing(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    axis: Axis,
    value: SizingFunction,
    basis: Option<f32>,
    padding_border: f32,
    box_sizing: BoxSizing,
) -> Option<f32> {
    match value {
        SizingFunction::Length(_) | SizingFunction::Percent(_) => value
            .resolve(basis)
            .map(|v| to_border_box(v, box_sizing, padding_border)),
        SizingFunction::MinContent => keyword_size(ctx, node, axis, IntrinsicSizingMode::MinContent),
        SizingFunction::MaxContent => keyword_size(ctx, node, axis, IntrinsicSizingMode::MaxContent),
        SizingFunction::FitContent(limit) => {
            let min = keyword_size(ctx, node, axis, IntrinsicSizingMode::MinContent)?;
            let max = keyword_size(ctx, node, axis, IntrinsicSizingMode::MaxContent)?;
            Some(fit_content(min, max, to_border_box(limit, box_sizing, padding_border)))
        }
        SizingFunction::Auto | SizingFunction::Fr(_) => None,
    }
}

fn keyword_size(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    axis: Axis,
    mode: IntrinsicSizingMode,
) -> Option<f32> {
    if ctx.is_measuring(node, axis) {
        None
    } else {
        Some(intrinsic::content_size(ctx, node, axis, mode))
    }
}
