//! Layout dispatch.
//!
//! [`layout_node`] is the single recursive entry used by every algorithm:
//! it resolves the node's box, then routes to block flow, flex, grid or
//! leaf measurement. Sizes in [`LayoutInput`] and [`ComputedLayout`] are
//! border-box sizes.

use rustkit_style::{BoxStyle, Display};
use rustkit_text::{max_content_width, min_content_width, wrap_text};

use crate::context::LayoutContext;
use crate::geometry::{AvailableSpace, Axis, EdgeSizes, GeometryResult, Size};
use crate::resolve::{fit_content, resolve_box, ResolvedBox};
use crate::tree::{BoxKind, NodeId};
use crate::{block, flex, grid};

/// Whether a call only needs the node's size or must also place children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compute the node's size; write no geometry.
    ComputeSize,
    /// Compute the size and write geometry for every in-flow child.
    PerformLayout,
}

/// Constraints handed to a node by its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutInput {
    /// Sizes fixed by the parent's algorithm.
    pub known_size: Size<Option<f32>>,
    /// Containing block content size, the basis for percentages.
    pub parent_size: Size<Option<f32>>,
    /// Space for the node's border box, margins already removed.
    pub available_space: Size<AvailableSpace>,
    pub run_mode: RunMode,
}

impl LayoutInput {
    /// Intrinsic measurement: `space` on `axis`, max-content on the other.
    pub fn measure(axis: Axis, space: AvailableSpace) -> Self {
        let mut available_space = Size::new(AvailableSpace::MaxContent, AvailableSpace::MaxContent);
        available_space.set(axis, space);
        Self {
            known_size: Size::NONE,
            parent_size: Size::NONE,
            available_space,
            run_mode: RunMode::ComputeSize,
        }
    }

    /// Final layout at a size the parent has settled on.
    pub fn perform(size: Size<f32>, parent_size: Size<Option<f32>>) -> Self {
        Self {
            known_size: size.map(Some),
            parent_size,
            available_space: size.map(AvailableSpace::Definite),
            run_mode: RunMode::PerformLayout,
        }
    }
}

/// Size of a laid-out node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ComputedLayout {
    pub size: Size<f32>,
    /// Overflow extent from the border-box origin.
    pub content_size: Size<f32>,
}

impl ComputedLayout {
    pub fn new(size: Size<f32>) -> Self {
        Self {
            size,
            content_size: size,
        }
    }

    fn sanitized(self) -> Self {
        let geometry = GeometryResult {
            width: self.size.width,
            height: self.size.height,
            content_size: self.content_size,
            ..GeometryResult::default()
        }
        .sanitized();
        Self {
            size: Size::new(geometry.width, geometry.height),
            content_size: geometry.content_size,
        }
    }
}

/// Lay out `node` under `input`.
pub(crate) fn layout_node(ctx: &mut LayoutContext<'_>, node: NodeId, input: LayoutInput) -> ComputedLayout {
    let tree = ctx.tree;
    let style = tree.style(node);
    ctx.trace.enter(node, input.run_mode);

    let output = if style.display == Display::None {
        ComputedLayout::default()
    } else {
        let resolved = resolve_box(ctx, node, input.parent_size, input.known_size);
        match &tree.get(node).kind {
            BoxKind::Text(text) => layout_text(ctx, style, text, &resolved, input),
            BoxKind::Replaced { width, height } => layout_replaced(&resolved, *width, *height),
            BoxKind::Container => match style.display {
                Display::Flex => flex::layout_flex(ctx, node, &resolved, input),
                Display::Grid => grid::layout_grid(ctx, node, &resolved, input),
                _ => block::layout_block(ctx, node, &resolved, input),
            },
        }
    }
    .sanitized();

    ctx.trace.leave(node, output.size);
    output
}

// ==================== Leaves ====================

fn layout_text(
    ctx: &mut LayoutContext<'_>,
    style: &BoxStyle,
    text: &str,
    resolved: &ResolvedBox,
    input: LayoutInput,
) -> ComputedLayout {
    let pb = resolved.padding_border();
    let font_size = style.font_size;

    let width = resolved.size.width.unwrap_or_else(|| {
        let min = min_content_width(ctx.text, text, font_size);
        let max = max_content_width(ctx.text, text, font_size);
        let inner = match input.available_space.width {
            AvailableSpace::Definite(available) => fit_content(min, max, available - pb.horizontal()),
            AvailableSpace::MinContent => min,
            AvailableSpace::MaxContent => max,
        };
        resolved.clamp(Axis::Horizontal, inner + pb.horizontal())
    });

    // Epsilon keeps a line that fits exactly from wrapping on rounding noise.
    let inner_width = (width - pb.horizontal()).max(0.0);
    let wrapped = wrap_text(ctx.text, text, font_size, inner_width + ctx.config.epsilon);

    let height = resolved.size.height.unwrap_or_else(|| {
        let lines = wrapped.line_count as f32 * style.line_height_px();
        resolved.clamp(Axis::Vertical, lines + pb.vertical())
    });

    ComputedLayout {
        size: Size::new(width, height),
        content_size: Size::new(
            wrapped.max_line_width + pb.horizontal(),
            wrapped.line_count as f32 * style.line_height_px() + pb.vertical(),
        ),
    }
}

/// Replaced boxes keep their natural aspect ratio when one side is given.
fn layout_replaced(resolved: &ResolvedBox, natural_width: f32, natural_height: f32) -> ComputedLayout {
    let pb = resolved.padding_border().sums();
    let natural_width = natural_width.max(0.0);
    let natural_height = natural_height.max(0.0);
    let ratio = (natural_width > 0.0 && natural_height > 0.0).then(|| natural_width / natural_height);

    let (width, height) = match (resolved.size.width, resolved.size.height) {
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) => {
            let inner = ratio.map_or(natural_height, |r| (width - pb.width).max(0.0) / r);
            (width, resolved.clamp(Axis::Vertical, inner + pb.height))
        }
        (None, Some(height)) => {
            let inner = ratio.map_or(natural_width, |r| (height - pb.height).max(0.0) * r);
            (resolved.clamp(Axis::Horizontal, inner + pb.width), height)
        }
        (None, None) => (
            resolved.clamp(Axis::Horizontal, natural_width + pb.width),
            resolved.clamp(Axis::Vertical, natural_height + pb.height),
        ),
    };

    ComputedLayout::new(Size::new(width, height))
}

// ==================== Child placement ====================

/// Tracks the overflow extent of a container from its border-box origin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OverflowTracker {
    content_origin: Size<f32>,
    extent: Size<f32>,
}

impl OverflowTracker {
    pub fn new(size: Size<f32>, padding_border: &EdgeSizes) -> Self {
        Self {
            content_origin: Size::new(padding_border.left, padding_border.top),
            extent: size,
        }
    }

    /// Include a child's margin box.
    pub fn include(&mut self, geometry: &GeometryResult, margin: &EdgeSizes) {
        let right = self.content_origin.width + geometry.x + geometry.content_size.width.max(geometry.width) + margin.right;
        let bottom =
            self.content_origin.height + geometry.y + geometry.content_size.height.max(geometry.height) + margin.bottom;
        if right.is_finite() {
            self.extent.width = self.extent.width.max(right);
        }
        if bottom.is_finite() {
            self.extent.height = self.extent.height.max(bottom);
        }
    }

    pub fn finish(self) -> Size<f32> {
        self.extent
    }
}

/// Lay out `child` at its final size and record its geometry.
///
/// `position` is the border-box origin relative to the parent's content box.
pub(crate) fn place_child(
    ctx: &mut LayoutContext<'_>,
    child: NodeId,
    position: Size<f32>,
    size: Size<f32>,
    parent_size: Size<Option<f32>>,
    margin: &EdgeSizes,
    overflow: &mut OverflowTracker,
) {
    let layout = layout_node(ctx, child, LayoutInput::perform(size, parent_size));
    let geometry = GeometryResult {
        x: position.width,
        y: position.height,
        width: layout.size.width,
        height: layout.size.height,
        content_size: layout.content_size,
    };
    overflow.include(&geometry, margin);
    ctx.set_geometry(child, geometry);
}

/// In-flow children: not `display: none` and not absolutely positioned.
pub(crate) fn in_flow_children(ctx: &LayoutContext<'_>, node: NodeId) -> Vec<NodeId> {
    let tree = ctx.tree;
    tree.children(node)
        .iter()
        .copied()
        .filter(|&child| {
            let style = tree.style(child);
            style.display != Display::None && !style.position.is_out_of_flow()
        })
        .collect()
}
