//! Block flow.
//!
//! Children stack top to bottom. Auto widths stretch to the containing
//! block; horizontal auto margins center or push. Margins do not collapse
//! and floats are not supported.

use tracing::debug;

use crate::compute::{
    in_flow_children, layout_node, place_child, ComputedLayout, LayoutInput, OverflowTracker, RunMode,
};
use crate::context::LayoutContext;
use crate::geometry::{AvailableSpace, Axis, Size};
use crate::intrinsic::{self, IntrinsicSizingMode};
use crate::resolve::{resolve_box, resolve_margins, ResolvedBox};
use crate::tree::{BoxKind, NodeId};

pub(crate) fn layout_block(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    resolved: &ResolvedBox,
    input: LayoutInput,
) -> ComputedLayout {
    let tree = ctx.tree;
    let pb = resolved.padding_border();
    let children = in_flow_children(ctx, node);

    let width = match resolved.size.width {
        Some(width) => width,
        None => {
            let inner = match input.available_space.width {
                AvailableSpace::Definite(available) => (available - pb.horizontal()).max(0.0),
                AvailableSpace::MinContent => widest_child(ctx, &children, IntrinsicSizingMode::MinContent),
                AvailableSpace::MaxContent => widest_child(ctx, &children, IntrinsicSizingMode::MaxContent),
            };
            resolved.clamp(Axis::Horizontal, inner + pb.horizontal())
        }
    };
    let content_width = (width - pb.horizontal()).max(0.0);
    let content_height = resolved.content_box_size().height;
    let child_parent_size = Size::new(Some(content_width), content_height);

    let mut placements = Vec::with_capacity(children.len());
    let mut cursor = 0.0;

    for &child in &children {
        let style = tree.style(child);
        let (margin, auto) = resolve_margins(style, Some(content_width));
        let available = (content_width - margin.horizontal()).max(0.0);

        let stretch = style.width.is_auto() && !matches!(tree.get(child).kind, BoxKind::Replaced { .. });
        let known_width = if stretch {
            let child_box = resolve_box(ctx, child, child_parent_size, Size::NONE);
            Some(child_box.clamp(Axis::Horizontal, available))
        } else {
            None
        };

        let layout = layout_node(
            ctx,
            child,
            LayoutInput {
                known_size: Size::new(known_width, None),
                parent_size: child_parent_size,
                available_space: Size::new(AvailableSpace::Definite(available), AvailableSpace::MaxContent),
                run_mode: RunMode::ComputeSize,
            },
        );

        let free = available - layout.size.width;
        let offset = match (auto.left, auto.right) {
            (true, true) => (free / 2.0).max(0.0),
            (true, false) => free.max(0.0),
            _ => 0.0,
        };

        cursor += margin.top;
        placements.push((child, Size::new(margin.left + offset, cursor), layout.size, margin));
        cursor += layout.size.height + margin.bottom;
    }

    let height = resolved
        .size
        .height
        .unwrap_or_else(|| resolved.clamp(Axis::Vertical, cursor + pb.vertical()));
    let size = Size::new(width, height);

    debug!(node = %node, children = children.len(), width, height, "block layout");

    let mut overflow = OverflowTracker::new(size, &pb);
    if input.run_mode == RunMode::PerformLayout {
        let parent_size = Size::new(Some(content_width), Some((height - pb.vertical()).max(0.0)));
        for (child, position, child_size, margin) in placements {
            place_child(ctx, child, position, child_size, parent_size, &margin, &mut overflow);
        }
    }

    ComputedLayout {
        size,
        content_size: overflow.finish(),
    }
}

/// Widest outer intrinsic width among `children`.
fn widest_child(ctx: &mut LayoutContext<'_>, children: &[NodeId], mode: IntrinsicSizingMode) -> f32 {
    let tree = ctx.tree;
    children
        .iter()
        .map(|&child| {
            let (margin, _) = resolve_margins(tree.style(child), None);
            intrinsic::measure(ctx, child, Axis::Horizontal, mode) + margin.horizontal()
        })
        .fold(0.0, f32::max)
}
