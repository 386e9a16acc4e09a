//! Flexbox layout implementation for RustKit.
//!
//! Implements the CSS Flexible Box Layout Module Level 1:
//! https://www.w3.org/TR/css-flexbox-1/
//!
//! The algorithm runs in phases, each reading only what earlier phases
//! produced:
//! 1. Collect in-flow items and resolve flex base sizes
//! 2. Sort by `order`
//! 3. Collect items into flex lines
//! 4. Resolve flexible lengths (grow/shrink, see [`crate::freeze`])
//! 5. Hypothetical cross sizes and line cross sizes
//! 6. Multi-line alignment (align-content) and stretch
//! 7. Main axis alignment (justify-content, auto margins)
//! 8. Cross axis alignment (align-items, align-self)
//! 9. Container sizing and reverse directions

use std::ops::Range;

use rustkit_style::{AlignItems, BoxStyle, FlexBasis, FlexWrap};
use tracing::{debug, trace};

use crate::align::{align_single, distribute, DistributionMode};
use crate::compute::{in_flow_children, layout_node, place_child, ComputedLayout, LayoutInput, OverflowTracker, RunMode};
use crate::context::LayoutContext;
use crate::freeze::{resolve_flexible_lengths, FlexibleItem};
use crate::geometry::{AvailableSpace, Axis, EdgeSizes, Size};
use crate::intrinsic::{self, IntrinsicSizingMode};
use crate::resolve::{finite_or, resolve_box, resolve_margins, to_border_box, AutoMargins, ResolvedBox};
use crate::tree::NodeId;

/// A flex item during layout computation.
#[derive(Debug, Clone)]
struct FlexItem {
    node: NodeId,

    /// Order property for sorting.
    order: i32,

    /// The item's box resolved against the container's content box.
    resolved: ResolvedBox,

    margin: EdgeSizes,
    auto_margins: AutoMargins,

    /// Flex base size (border box).
    flex_basis: f32,

    /// Base size clamped by min/max.
    hypothetical_main_size: f32,

    min_main_size: f32,
    max_main_size: f32,
    flex_grow: f32,
    flex_shrink: f32,

    /// `align-self` resolved against the container's `align-items`.
    align: AlignItems,

    /// Cross size if the item stretches across a definite single line.
    stretched_cross: Option<f32>,

    /// Main size after flexible lengths are resolved.
    target_main_size: f32,

    /// Cross size when laid out at the target main size.
    hypothetical_cross_size: f32,

    /// Cross size after stretching.
    target_cross_size: f32,

    /// Border-box offsets in the container's content box.
    main_position: f32,
    cross_position: f32,
}

/// A line of flex items.
#[derive(Debug, Clone)]
struct FlexLine {
    /// Indices into the sorted item list.
    items: Range<usize>,
    cross_size: f32,
    cross_position: f32,
    /// Main-axis space left after flexing. Negative on overflow.
    free_space: f32,
}

/// Axis bookkeeping for one container.
#[derive(Debug, Clone, Copy)]
struct FlexAxes {
    main: Axis,
    cross: Axis,
    /// `*-reverse` direction.
    main_reversed: bool,
    /// `wrap-reverse`.
    cross_reversed: bool,
}

impl FlexAxes {
    fn new(style: &BoxStyle) -> Self {
        let main = if style.flex_direction.is_row() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        Self {
            main,
            cross: main.cross(),
            main_reversed: style.flex_direction.is_reverse(),
            cross_reversed: style.flex_wrap == FlexWrap::WrapReverse,
        }
    }
}

// Offsets are computed forward and mirrored afterwards, so on a reversed
// axis the physical end edge leads.

fn leading(margin: &EdgeSizes, axis: Axis, reversed: bool) -> f32 {
    if reversed {
        margin.end(axis)
    } else {
        margin.start(axis)
    }
}

fn trailing(margin: &EdgeSizes, axis: Axis, reversed: bool) -> f32 {
    leading(margin, axis, !reversed)
}

fn leading_auto(auto: &AutoMargins, axis: Axis, reversed: bool) -> bool {
    if reversed {
        auto.end(axis)
    } else {
        auto.start(axis)
    }
}

fn trailing_auto(auto: &AutoMargins, axis: Axis, reversed: bool) -> bool {
    leading_auto(auto, axis, !reversed)
}

/// Gap between neighbours along `axis`.
fn gap(style: &BoxStyle, axis: Axis, inner_size: Size<Option<f32>>) -> f32 {
    let value = match axis {
        Axis::Horizontal => style.column_gap.resolve(inner_size.width),
        Axis::Vertical => style.row_gap.resolve(inner_size.height),
    };
    value.max(0.0)
}

/// Lay out a flex container.
pub(crate) fn layout_flex(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    resolved: &ResolvedBox,
    input: LayoutInput,
) -> ComputedLayout {
    let tree = ctx.tree;
    let config = ctx.config;
    let style = tree.style(node);
    let axes = FlexAxes::new(style);
    let (main, cross) = (axes.main, axes.cross);

    let pb = resolved.padding_border();
    let pb_main = pb.sum(main);
    let pb_cross = pb.sum(cross);
    let inner_size = resolved.content_box_size();
    let main_space = inner_size
        .get(main)
        .map_or(input.available_space.get(main).shrink(pb_main), AvailableSpace::Definite);
    let cross_space = inner_size
        .get(cross)
        .map_or(input.available_space.get(cross).shrink(pb_cross), AvailableSpace::Definite);
    let main_gap = gap(style, main, inner_size);
    let cross_gap = gap(style, cross, inner_size);

    // Phase 1: collect
    let children = in_flow_children(ctx, node);
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        items.push(collect_item(ctx, style, child, main, inner_size, main_space));
    }

    // Phase 2: order (stable, so ties keep source order)
    items.sort_by_key(|item| item.order);

    // Phase 3: lines
    // An auto main size is indefinite for line breaking, whatever space the parent offers.
    let line_space = match main_space {
        AvailableSpace::Definite(_) if inner_size.get(main).is_none() => AvailableSpace::MaxContent,
        space => space,
    };
    let outer_hypothetical: Vec<f32> = items
        .iter()
        .map(|item| item.hypothetical_main_size + item.margin.sum(main))
        .collect();
    let ranges = break_lines(
        &outer_hypothetical,
        line_space.as_wrap_width(),
        main_gap,
        style.flex_wrap.is_wrapping(),
        config.epsilon,
    );

    let inner_main = match inner_size.get(main) {
        Some(size) => size,
        None => {
            let totals = ranges
                .iter()
                .map(|range| line_total(&outer_hypothetical[range.clone()], main_gap));
            // Under a min-content constraint every item is its own line and the largest wins.
            let content_main = if line_space == AvailableSpace::MinContent {
                totals.fold(0.0, f32::max)
            } else {
                totals.sum::<f32>()
            };
            resolved.clamp(main, finite_or(content_main, 0.0) + pb_main) - pb_main
        }
    };

    // Phase 4: flexible lengths
    let mut lines = Vec::with_capacity(ranges.len());
    for range in ranges {
        let flexible: Vec<FlexibleItem> = items[range.clone()]
            .iter()
            .map(|item| FlexibleItem {
                basis: item.flex_basis,
                hypothetical: item.hypothetical_main_size,
                grow: item.flex_grow,
                shrink: item.flex_shrink,
                min: item.min_main_size,
                max: item.max_main_size,
                outer: item.margin.sum(main),
            })
            .collect();
        let gaps = main_gap * range.len().saturating_sub(1) as f32;
        let report = resolve_flexible_lengths(
            &flexible,
            inner_main - gaps,
            config.max_flex_iterations,
            config.epsilon,
        );
        for (item, size) in items[range.clone()].iter_mut().zip(&report.sizes) {
            item.target_main_size = *size;
        }
        lines.push(FlexLine {
            items: range,
            cross_size: 0.0,
            cross_position: 0.0,
            free_space: report.remaining_free_space,
        });
    }

    // Phase 5: cross sizes
    let single_line = !style.flex_wrap.is_wrapping();
    for item in items.iter_mut() {
        // A single definite line already fixes the size of items that stretch.
        let known_cross = if single_line {
            item.stretched_cross
        } else {
            item.resolved.size.get(cross)
        };
        let layout = layout_node(
            ctx,
            item.node,
            LayoutInput {
                known_size: Size::from_main_cross(main, Some(item.target_main_size), known_cross),
                parent_size: inner_size,
                available_space: Size::from_main_cross(
                    main,
                    AvailableSpace::Definite(item.target_main_size),
                    cross_space.shrink(item.margin.sum(cross)),
                ),
                run_mode: RunMode::ComputeSize,
            },
        );
        item.hypothetical_cross_size = layout.size.get(cross);
    }

    for line in lines.iter_mut() {
        line.cross_size = items[line.items.clone()]
            .iter()
            .map(|item| item.hypothetical_cross_size + item.margin.sum(cross))
            .fold(0.0, f32::max);
    }

    let cross_gaps = cross_gap * lines.len().saturating_sub(1) as f32;
    let content_cross: f32 = lines.iter().map(|line| line.cross_size).sum::<f32>() + cross_gaps;
    let inner_cross = match inner_size.get(cross) {
        Some(size) => size,
        None => resolved.clamp(cross, finite_or(content_cross, 0.0) + pb_cross) - pb_cross,
    };

    // Phase 6: line cross sizes and positions
    if single_line {
        if let Some(line) = lines.first_mut() {
            line.cross_size = inner_cross;
        }
    } else if !lines.is_empty() {
        let mode = DistributionMode::from_align_content(style.align_content, axes.cross_reversed);
        let mut free = inner_cross - content_cross;
        if mode == DistributionMode::Stretch && free > 0.0 {
            let extra = free / lines.len() as f32;
            for line in lines.iter_mut() {
                line.cross_size += extra;
            }
            free = 0.0;
        }
        let extents: Vec<f32> = lines.iter().map(|line| line.cross_size).collect();
        for (line, offset) in lines.iter_mut().zip(distribute(&extents, free, mode, cross_gap)) {
            line.cross_position = offset;
        }
    }

    for line in &lines {
        for item in &mut items[line.items.clone()] {
            let stretches = item.align == AlignItems::Stretch
                && item.resolved.size.get(cross).is_none()
                && item.auto_margins.count(cross) == 0;
            item.target_cross_size = if stretches {
                item.resolved.clamp(cross, line.cross_size - item.margin.sum(cross))
            } else {
                item.hypothetical_cross_size
            };
        }
    }

    // Phase 7: main axis
    let justify = DistributionMode::from_justify_content(style.justify_content, axes.main_reversed);
    for line in &lines {
        let line_items = &mut items[line.items.clone()];
        let auto_count: usize = line_items.iter().map(|item| item.auto_margins.count(main)).sum();

        if auto_count > 0 {
            let share = (line.free_space / auto_count as f32).max(0.0);
            let mut cursor = 0.0;
            for item in line_items.iter_mut() {
                if leading_auto(&item.auto_margins, main, axes.main_reversed) {
                    cursor += share;
                }
                cursor += leading(&item.margin, main, axes.main_reversed);
                item.main_position = cursor;
                cursor += item.target_main_size + trailing(&item.margin, main, axes.main_reversed);
                if trailing_auto(&item.auto_margins, main, axes.main_reversed) {
                    cursor += share;
                }
                cursor += main_gap;
            }
        } else {
            let extents: Vec<f32> = line_items
                .iter()
                .map(|item| item.target_main_size + item.margin.sum(main))
                .collect();
            let offsets = distribute(&extents, line.free_space, justify, main_gap);
            for (item, offset) in line_items.iter_mut().zip(offsets) {
                item.main_position = offset + leading(&item.margin, main, axes.main_reversed);
            }
        }
    }

    // Phase 8: cross axis
    for line in &lines {
        for item in &mut items[line.items.clone()] {
            let free = line.cross_size - item.target_cross_size - item.margin.sum(cross);
            let lead_auto = leading_auto(&item.auto_margins, cross, axes.cross_reversed);
            let trail_auto = trailing_auto(&item.auto_margins, cross, axes.cross_reversed);
            let offset = match (lead_auto, trail_auto) {
                (true, true) => free.max(0.0) / 2.0,
                (true, false) => free.max(0.0),
                (false, true) => 0.0,
                (false, false) => align_single(
                    free,
                    DistributionMode::from_align_items(item.align, axes.cross_reversed),
                ),
            };
            item.cross_position =
                line.cross_position + offset + leading(&item.margin, cross, axes.cross_reversed);
        }
    }

    // Phase 9: mirror reversed axes
    for item in items.iter_mut() {
        if axes.main_reversed {
            item.main_position = inner_main - item.main_position - item.target_main_size;
        }
        if axes.cross_reversed {
            item.cross_position = inner_cross - item.cross_position - item.target_cross_size;
        }
    }

    let size = Size::from_main_cross(main, inner_main + pb_main, inner_cross + pb_cross);
    debug!(
        node = %node,
        items = items.len(),
        lines = lines.len(),
        width = size.width,
        height = size.height,
        "flex layout"
    );

    let mut overflow = OverflowTracker::new(size, &pb);
    if input.run_mode == RunMode::PerformLayout {
        let parent_size = Size::from_main_cross(main, Some(inner_main), Some(inner_cross));
        for item in &items {
            let position = Size::from_main_cross(main, item.main_position, item.cross_position);
            let item_size = Size::from_main_cross(main, item.target_main_size, item.target_cross_size);
            trace!(
                node = %item.node,
                x = position.width,
                y = position.height,
                width = item_size.width,
                height = item_size.height,
                "flex item"
            );
            place_child(ctx, item.node, position, item_size, parent_size, &item.margin, &mut overflow);
        }
    }

    ComputedLayout {
        size,
        content_size: overflow.finish(),
    }
}

/// Phase 1 for one child: margins, flex base size and main-axis clamps.
fn collect_item(
    ctx: &mut LayoutContext<'_>,
    container: &BoxStyle,
    child: NodeId,
    main: Axis,
    inner_size: Size<Option<f32>>,
    main_space: AvailableSpace,
) -> FlexItem {
    let tree = ctx.tree;
    let style = tree.style(child);
    let cross = main.cross();
    let (margin, auto_margins) = resolve_margins(style, inner_size.width);
    let resolved = resolve_box(ctx, child, inner_size, Size::NONE);
    let pb_main = resolved.padding_border().sum(main);
    let align = style.align_self.or_items(container.align_items);

    // The cross size the item will get if it stretches across a definite line.
    let cross_hint = resolved.size.get(cross).or_else(|| {
        let stretches = align == AlignItems::Stretch && auto_margins.count(cross) == 0;
        let inner_cross = inner_size.get(cross)?;
        stretches.then(|| resolved.clamp(cross, inner_cross - margin.sum(cross)))
    });

    let specified = match style.flex_basis {
        FlexBasis::Length(value) => Some(to_border_box(value, style.box_sizing, pb_main)),
        FlexBasis::Percent(percent) => inner_size
            .get(main)
            .map(|basis| to_border_box(basis * percent / 100.0, style.box_sizing, pb_main))
            .or(resolved.size.get(main)),
        FlexBasis::Auto => resolved.size.get(main),
        FlexBasis::Content => None,
    };
    let mode = if main_space == AvailableSpace::MinContent {
        IntrinsicSizingMode::MinContent
    } else {
        IntrinsicSizingMode::MaxContent
    };
    let flex_basis = match specified {
        Some(basis) => basis,
        None => content_main_size(ctx, child, main, mode, cross_hint, inner_size),
    };

    let max_main_size = resolved.max_size.get(main).unwrap_or(f32::INFINITY);
    let overflow = match main {
        Axis::Horizontal => style.overflow_x,
        Axis::Vertical => style.overflow_y,
    };
    let min_main_size = match resolved.min_size.get(main) {
        Some(min) => min,
        None if !overflow.is_scroll_container() => {
            let content_min =
                content_main_size(ctx, child, main, IntrinsicSizingMode::MinContent, cross_hint, inner_size);
            let capped = resolved.size.get(main).map_or(content_min, |size| content_min.min(size));
            capped.min(max_main_size)
        }
        None => 0.0,
    }
    .max(pb_main);

    let hypothetical_main_size = flex_basis.min(max_main_size).max(min_main_size);

    trace!(
        node = %child,
        flex_basis,
        hypothetical_main_size,
        min_main_size,
        "flex item collected"
    );

    FlexItem {
        node: child,
        order: style.order,
        resolved,
        margin,
        auto_margins,
        flex_basis,
        hypothetical_main_size,
        min_main_size,
        max_main_size,
        flex_grow: finite_or(style.flex_grow, 0.0).max(0.0),
        flex_shrink: finite_or(style.flex_shrink, 0.0).max(0.0),
        align,
        stretched_cross: cross_hint,
        target_main_size: hypothetical_main_size,
        hypothetical_cross_size: 0.0,
        target_cross_size: 0.0,
        main_position: 0.0,
        cross_position: 0.0,
    }
}

/// Content-based main size of an item.
///
/// Horizontal sizes come from the intrinsic cache. Vertical sizes depend on
/// the width the item will have, so they are laid out at `cross_hint` when
/// it is known.
fn content_main_size(
    ctx: &mut LayoutContext<'_>,
    child: NodeId,
    main: Axis,
    mode: IntrinsicSizingMode,
    cross_hint: Option<f32>,
    parent_size: Size<Option<f32>>,
) -> f32 {
    match (main, cross_hint) {
        (Axis::Vertical, Some(width)) => {
            ctx.begin_measure(child, Axis::Vertical);
            let height = intrinsic::height_at_width(ctx, child, width, parent_size);
            ctx.end_measure();
            height
        }
        _ => intrinsic::content_size(ctx, child, main, mode),
    }
}

/// Outer sizes plus the gaps between them.
fn line_total(outer_sizes: &[f32], gap: f32) -> f32 {
    outer_sizes.iter().sum::<f32>() + gap * outer_sizes.len().saturating_sub(1) as f32
}

/// Split items into lines no longer than `limit`.
///
/// Every line holds at least one item, even one that overflows on its own.
fn break_lines(outer_sizes: &[f32], limit: f32, gap: f32, wrap: bool, epsilon: f32) -> Vec<Range<usize>> {
    if outer_sizes.is_empty() {
        return Vec::new();
    }
    if !wrap {
        return vec![0..outer_sizes.len()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut running = 0.0;
    for (index, size) in outer_sizes.iter().enumerate() {
        if index > start && running + gap + size > limit + epsilon {
            lines.push(start..index);
            start = index;
            running = *size;
        } else if index > start {
            running += gap + size;
        } else {
            running = *size;
        }
    }
    lines.push(start..outer_sizes.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::geometry::GeometryResult;
    use crate::tree::BoxTree;
    use rustkit_style::{FlexDirection, JustifyContent, Length, SizingFunction};
    use rustkit_text::ApproximateMeasurer;

    fn fixed(width: f32, height: f32) -> BoxStyle {
        BoxStyle {
            width: SizingFunction::Length(width),
            height: SizingFunction::Length(height),
            ..BoxStyle::new()
        }
    }

    fn run(tree: &BoxTree, root: NodeId, size: Size<f32>) -> Vec<Option<GeometryResult>> {
        let config = LayoutConfig::default();
        let measurer = ApproximateMeasurer::default();
        let mut ctx = LayoutContext::new(tree, &config, &measurer);
        layout_node(&mut ctx, root, LayoutInput::perform(size, Size::NONE));
        ctx.into_parts().0
    }

    fn rect(geometry: &[Option<GeometryResult>], node: NodeId) -> (f32, f32, f32, f32) {
        let g = geometry[node.index()].expect("child has geometry");
        (g.x, g.y, g.width, g.height)
    }

    #[test]
    fn test_break_lines() {
        let sizes = [40.0, 40.0, 40.0, 120.0, 10.0];
        assert_eq!(break_lines(&sizes, 100.0, 10.0, true, 0.01), vec![0..2, 2..3, 3..4, 4..5]);
        assert_eq!(break_lines(&sizes, 100.0, 0.0, true, 0.01), vec![0..2, 2..3, 3..4, 4..5]);
        assert_eq!(break_lines(&sizes, 100.0, 10.0, false, 0.01), vec![0..5]);
        assert!(break_lines(&[], 100.0, 0.0, true, 0.01).is_empty());
    }

    #[test]
    fn test_row_grow_and_stretch() {
        let mut tree = BoxTree::new();
        let a = tree.container(BoxStyle {
            flex_basis: FlexBasis::Length(50.0),
            flex_grow: 1.0,
            ..BoxStyle::new()
        });
        let b = tree.container(BoxStyle {
            flex_basis: FlexBasis::Length(50.0),
            flex_grow: 3.0,
            height: SizingFunction::Length(20.0),
            ..BoxStyle::new()
        });
        let root = tree
            .with_children(BoxStyle::flex(FlexDirection::Row), &[a, b])
            .unwrap();

        let geometry = run(&tree, root, Size::new(300.0, 100.0));
        assert_eq!(rect(&geometry, a), (0.0, 0.0, 100.0, 100.0));
        assert_eq!(rect(&geometry, b), (100.0, 0.0, 200.0, 20.0));
    }

    #[test]
    fn test_justify_center_and_gap() {
        let mut tree = BoxTree::new();
        let a = tree.container(fixed(40.0, 10.0));
        let b = tree.container(fixed(40.0, 10.0));
        let style = BoxStyle {
            justify_content: JustifyContent::Center,
            column_gap: Length::Px(20.0),
            ..BoxStyle::flex(FlexDirection::Row)
        };
        let root = tree.with_children(style, &[a, b]).unwrap();

        let geometry = run(&tree, root, Size::new(200.0, 50.0));
        assert_eq!(rect(&geometry, a).0, 50.0);
        assert_eq!(rect(&geometry, b).0, 110.0);
    }

    #[test]
    fn test_row_reverse_mirrors_main_axis() {
        let mut tree = BoxTree::new();
        let a = tree.container(fixed(30.0, 10.0));
        let b = tree.container(fixed(50.0, 10.0));
        let root = tree
            .with_children(BoxStyle::flex(FlexDirection::RowReverse), &[a, b])
            .unwrap();

        let geometry = run(&tree, root, Size::new(200.0, 50.0));
        assert_eq!(rect(&geometry, a).0, 170.0);
        assert_eq!(rect(&geometry, b).0, 120.0);
    }

    #[test]
    fn test_order_sorts_items() {
        let mut tree = BoxTree::new();
        let first = tree.container(BoxStyle {
            order: 2,
            ..fixed(10.0, 10.0)
        });
        let second = tree.container(fixed(20.0, 10.0));
        let root = tree
            .with_children(BoxStyle::flex(FlexDirection::Row), &[first, second])
            .unwrap();

        let geometry = run(&tree, root, Size::new(100.0, 10.0));
        assert_eq!(rect(&geometry, second).0, 0.0);
        assert_eq!(rect(&geometry, first).0, 20.0);
    }

    #[test]
    fn test_column_auto_height_sums_items() {
        let mut tree = BoxTree::new();
        let a = tree.container(fixed(10.0, 30.0));
        let b = tree.container(fixed(10.0, 40.0));
        let style = BoxStyle {
            row_gap: Length::Px(5.0),
            ..BoxStyle::flex(FlexDirection::Column)
        };
        let root = tree.with_children(style, &[a, b]).unwrap();

        let config = LayoutConfig::default();
        let measurer = ApproximateMeasurer::default();
        let mut ctx = LayoutContext::new(&tree, &config, &measurer);
        let layout = layout_node(
            &mut ctx,
            root,
            LayoutInput {
                known_size: Size::new(Some(100.0), None),
                parent_size: Size::NONE,
                available_space: Size::new(AvailableSpace::Definite(100.0), AvailableSpace::MaxContent),
                run_mode: RunMode::PerformLayout,
            },
        );
        assert_eq!(layout.size, Size::new(100.0, 75.0));
        let geometry = ctx.into_parts().0;
        assert_eq!(rect(&geometry, b), (0.0, 35.0, 10.0, 40.0));
    }

    #[test]
    fn test_main_auto_margin_absorbs_free_space() {
        let mut tree = BoxTree::new();
        let a = tree.container(fixed(20.0, 10.0));
        let b = tree.container(BoxStyle {
            margin_left: Length::Auto,
            ..fixed(30.0, 10.0)
        });
        let style = BoxStyle {
            justify_content: JustifyContent::Center,
            ..BoxStyle::flex(FlexDirection::Row)
        };
        let root = tree.with_children(style, &[a, b]).unwrap();

        let geometry = run(&tree, root, Size::new(100.0, 10.0));
        assert_eq!(rect(&geometry, a).0, 0.0);
        assert_eq!(rect(&geometry, b).0, 70.0);
    }

    #[test]
    fn test_wrapping_row_intrinsic_widths() {
        let mut tree = BoxTree::new();
        let a = tree.container(fixed(30.0, 10.0));
        let b = tree.container(fixed(50.0, 10.0));
        let style = BoxStyle {
            flex_wrap: FlexWrap::Wrap,
            ..BoxStyle::flex(FlexDirection::Row)
        };
        let root = tree.with_children(style, &[a, b]).unwrap();

        let config = LayoutConfig::default();
        let measurer = ApproximateMeasurer::default();
        let mut ctx = LayoutContext::new(&tree, &config, &measurer);
        let min = intrinsic::content_size(&mut ctx, root, Axis::Horizontal, IntrinsicSizingMode::MinContent);
        let max = intrinsic::content_size(&mut ctx, root, Axis::Horizontal, IntrinsicSizingMode::MaxContent);
        assert_eq!(min, 50.0);
        assert_eq!(max, 80.0);
    }
}
