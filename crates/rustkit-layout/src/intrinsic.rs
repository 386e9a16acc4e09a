//! Intrinsic sizing.
//!
//! Min-content and max-content extents are found by laying the subtree out
//! under an artificial constraint: zero available space forces every soft
//! wrap, unbounded space forbids them. Flex and grid containers run their
//! own algorithm under that constraint, so nothing here is mode-specific.

use rustkit_style::SizingFunction;
use tracing::trace;

use crate::compute::{layout_node, LayoutInput, RunMode};
use crate::context::LayoutContext;
use crate::geometry::{AvailableSpace, Axis, Size};
use crate::resolve::resolve_box;
use crate::tree::NodeId;

pub use crate::intrinsic_cache::IntrinsicSizingMode;

impl IntrinsicSizingMode {
    pub(crate) fn available_space(self) -> AvailableSpace {
        match self {
            IntrinsicSizingMode::MinContent => AvailableSpace::MinContent,
            IntrinsicSizingMode::MaxContent => AvailableSpace::MaxContent,
        }
    }
}

/// Content-based border-box extent of `node` on `axis`, ignoring the node's
/// own preferred size on that axis. Cached for the rest of the call.
pub(crate) fn content_size(ctx: &mut LayoutContext<'_>, node: NodeId, axis: Axis, mode: IntrinsicSizingMode) -> f32 {
    if let Some(size) = ctx.cache.lookup(node, axis, mode) {
        return size;
    }

    ctx.begin_measure(node, axis);
    let layout = layout_node(ctx, node, LayoutInput::measure(axis, mode.available_space()));
    ctx.end_measure();

    let size = layout.size.get(axis);
    trace!(node = %node, ?axis, ?mode, size, "intrinsic size");
    ctx.cache.store(node, axis, mode, size);
    size
}

/// Border-box extent of `node` on `axis` for `mode`: its explicit length
/// when it has one, otherwise its content size.
pub(crate) fn measure(ctx: &mut LayoutContext<'_>, node: NodeId, axis: Axis, mode: IntrinsicSizingMode) -> f32 {
    let tree = ctx.tree;
    let style = tree.style(node);
    let preferred = match axis {
        Axis::Horizontal => style.width,
        Axis::Vertical => style.height,
    };
    if let SizingFunction::Length(_) = preferred {
        if let Some(size) = resolve_box(ctx, node, Size::NONE, Size::NONE).size.get(axis) {
            return size;
        }
    }
    content_size(ctx, node, axis, mode)
}

/// Border-box height of `node` laid out at `width`.
///
/// Not cached: the answer depends on the width.
pub(crate) fn height_at_width(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    width: f32,
    parent_size: Size<Option<f32>>,
) -> f32 {
    let input = LayoutInput {
        known_size: Size::new(Some(width), None),
        parent_size,
        available_space: Size::new(AvailableSpace::Definite(width), AvailableSpace::MaxContent),
        run_mode: RunMode::ComputeSize,
    };
    layout_node(ctx, node, input).size.height
}
