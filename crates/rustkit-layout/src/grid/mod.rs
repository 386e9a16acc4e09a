//! CSS Grid Layout implementation for RustKit.
//!
//! Implements the CSS Grid Layout Module Level 1:
//! https://www.w3.org/TR/css-grid-1/
//!
//! A container is laid out in four steps:
//! 1. Expand the track templates and resolve named lines ([`tracks`])
//! 2. Place items into the implicit grid ([`placement`])
//! 3. Size columns, then rows at the resulting column widths ([`track_sizing`])
//! 4. Position tracks with the content-distribution properties and align
//!    each item inside its grid area

mod occupancy;
mod placement;
mod track_counts;
mod track_sizing;
mod tracks;

use std::ops::Range;

use rustkit_style::{AlignItems, AlignContent, BoxStyle, GridPlacement, JustifyContent, JustifyItems, Length};
use tracing::{debug, trace};

use crate::align::{align_single, distribute, DistributionMode};
use crate::compute::{in_flow_children, place_child, ComputedLayout, LayoutInput, OverflowTracker, RunMode};
use crate::context::LayoutContext;
use crate::geometry::{AvailableSpace, Axis, EdgeSizes, Size};
use crate::intrinsic::{self, IntrinsicSizingMode};
use crate::resolve::{fit_content, resolve_box, resolve_margins, AutoMargins, ResolvedBox};
use crate::tree::{BoxKind, NodeId};

use placement::{place_items, AxisLines};
use track_counts::{LineSpan, TrackCounts};
use track_sizing::{size_tracks, TrackItem};
use tracks::{build_tracks, expand_template, GridTrack};

/// A grid item during layout.
#[derive(Debug, Clone)]
struct GridItem {
    node: NodeId,
    resolved: ResolvedBox,
    margin: EdgeSizes,
    auto_margins: AutoMargins,
    replaced: bool,

    /// Track-list slots of the grid area.
    column_slots: Range<usize>,
    row_slots: Range<usize>,

    /// Border-box intrinsic widths.
    min_content_width: f32,
    max_content_width: f32,

    /// Final border-box size.
    width: f32,
    height: f32,
}

fn gap(value: Length, basis: Option<f32>) -> f32 {
    value.resolve(basis).max(0.0)
}

/// Slots from the first track of `span` to its last, gutters between
/// included.
fn slots(counts: &TrackCounts, span: LineSpan) -> Range<usize> {
    let start = counts.line_index(span.start).unwrap_or(0);
    let end = counts.line_index(span.end).unwrap_or(start + 1).max(start + 1);
    start * 2 + 1..end * 2
}

/// Offset and size of the area covered by `slots`.
fn area(tracks: &[GridTrack], slots: &Range<usize>) -> (f32, f32) {
    match (tracks.get(slots.start), slots.end.checked_sub(1).and_then(|last| tracks.get(last))) {
        (Some(first), Some(last)) => (first.offset, last.offset + last.base_size - first.offset),
        _ => (0.0, 0.0),
    }
}

/// Set track offsets from `inner_size` and the content-distribution mode.
///
/// Each visible track carries the gutter after it, so spacing modes add
/// their space on top of the gaps.
fn position_tracks(tracks: &mut [GridTrack], inner_size: f32, mode: DistributionMode) {
    let visible: Vec<usize> = (1..tracks.len())
        .step_by(2)
        .filter(|&slot| !tracks[slot].is_collapsed)
        .collect();
    let extents: Vec<f32> = visible
        .iter()
        .map(|&slot| tracks[slot].base_size + tracks.get(slot + 1).map_or(0.0, |gutter| gutter.base_size))
        .collect();
    let used: f32 = extents.iter().sum();
    let offsets = distribute(&extents, inner_size - used, mode, 0.0);

    let mut next_visible = visible.iter().zip(offsets).peekable();
    let mut cursor = 0.0;
    for slot in 0..tracks.len() {
        if let Some((_, offset)) = next_visible.next_if(|(visible_slot, _)| **visible_slot == slot) {
            cursor = offset;
        }
        tracks[slot].offset = cursor;
        cursor += tracks[slot].base_size;
    }
}

/// Outer minimum contribution: the item's min size when it has one,
/// otherwise its content-based minimum.
fn minimum_contribution(item: &GridItem, style: &BoxStyle, axis: Axis, min_content: f32) -> f32 {
    let margins = item.margin.sum(axis);
    if let Some(min) = item.resolved.min_size.get(axis) {
        return min + margins;
    }
    let overflow = match axis {
        Axis::Horizontal => style.overflow_x,
        Axis::Vertical => style.overflow_y,
    };
    if overflow.is_scroll_container() {
        return item.resolved.padding_border().sum(axis) + margins;
    }
    match item.resolved.size.get(axis) {
        Some(size) => min_content.min(size + margins),
        None => min_content,
    }
}

/// Lay out a grid container.
pub(crate) fn layout_grid(
    ctx: &mut LayoutContext<'_>,
    node: NodeId,
    resolved: &ResolvedBox,
    input: LayoutInput,
) -> ComputedLayout {
    let tree = ctx.tree;
    let config = ctx.config;
    let style = tree.style(node);

    let pb = resolved.padding_border();
    let inner_size = resolved.content_box_size();
    let available = Size::new(
        inner_size
            .width
            .map_or(input.available_space.width.shrink(pb.horizontal()), AvailableSpace::Definite),
        inner_size
            .height
            .map_or(input.available_space.height.shrink(pb.vertical()), AvailableSpace::Definite),
    );
    let column_gap = gap(style.column_gap, inner_size.width);
    let row_gap = gap(style.row_gap, inner_size.height);

    // Step 1: explicit grid
    let repeat_space = |axis: Axis| {
        inner_size
            .get(axis)
            .or_else(|| resolved.max_size.get(axis).map(|max| (max - pb.sum(axis)).max(0.0)))
    };
    let explicit_columns = expand_template(&style.grid_template_columns, repeat_space(Axis::Horizontal), column_gap);
    let explicit_rows = expand_template(&style.grid_template_rows, repeat_space(Axis::Vertical), row_gap);
    let areas = style.grid_template_areas.as_ref();
    let column_lines = AxisLines::new(&explicit_columns, areas, Axis::Horizontal);
    let row_lines = AxisLines::new(&explicit_rows, areas, Axis::Vertical);

    // Step 2: placement, in `order` then source order
    let mut children = in_flow_children(ctx, node);
    children.sort_by_key(|&child| tree.style(child).order);
    let requests: Vec<(NodeId, &GridPlacement)> = children
        .iter()
        .map(|&child| (child, &tree.style(child).grid_placement))
        .collect();
    let placement = place_items(
        &requests,
        &column_lines,
        &row_lines,
        style.grid_auto_flow,
        config.max_auto_placement_steps,
    );

    let column_counts = placement.columns();
    let row_counts = placement.rows();
    let mut columns = build_tracks(
        column_counts,
        &explicit_columns,
        &style.grid_auto_columns,
        column_gap,
        |line| placement.occupancy.column_is_occupied(line),
    );
    let mut rows = build_tracks(row_counts, &explicit_rows, &style.grid_auto_rows, row_gap, |line| {
        placement.occupancy.row_is_occupied(line)
    });

    let mut items: Vec<GridItem> = Vec::with_capacity(placement.items.len());
    for placed in &placement.items {
        let child_style = tree.style(placed.node);
        let (margin, auto_margins) = resolve_margins(child_style, inner_size.width);
        let child_resolved = resolve_box(ctx, placed.node, inner_size, Size::NONE);
        let min_content_width = intrinsic::measure(ctx, placed.node, Axis::Horizontal, IntrinsicSizingMode::MinContent);
        let max_content_width = intrinsic::measure(ctx, placed.node, Axis::Horizontal, IntrinsicSizingMode::MaxContent);
        items.push(GridItem {
            node: placed.node,
            resolved: child_resolved,
            margin,
            auto_margins,
            replaced: matches!(tree.get(placed.node).kind, BoxKind::Replaced { .. }),
            column_slots: slots(&column_counts, placed.columns),
            row_slots: slots(&row_counts, placed.rows),
            min_content_width,
            max_content_width,
            width: 0.0,
            height: 0.0,
        });
    }

    // Step 3a: columns
    let column_items: Vec<TrackItem> = items
        .iter()
        .map(|item| {
            let margins = item.margin.horizontal();
            let min_content = item.min_content_width + margins;
            TrackItem {
                slots: item.column_slots.clone(),
                min_content,
                max_content: item.max_content_width + margins,
                minimum: minimum_contribution(item, tree.style(item.node), Axis::Horizontal, min_content),
            }
        })
        .collect();
    size_tracks(
        Axis::Horizontal,
        &mut columns,
        &column_items,
        available.width,
        style.justify_content == JustifyContent::Stretch,
        config,
    );

    let column_total: f32 = columns.iter().map(|track| track.base_size).sum();
    let inner_width = inner_size
        .width
        .unwrap_or_else(|| resolved.clamp(Axis::Horizontal, column_total + pb.horizontal()) - pb.horizontal());
    position_tracks(
        &mut columns,
        inner_width,
        DistributionMode::from_justify_content(style.justify_content, false),
    );

    // Step 3b: rows, with each item at its width in its column area
    let mut row_items = Vec::with_capacity(items.len());
    for item in items.iter_mut() {
        let child_style = tree.style(item.node);
        let (_, area_width) = area(&columns, &item.column_slots);
        let free_width = (area_width - item.margin.horizontal()).max(0.0);
        let justify = child_style.justify_self.or_items(style.justify_items);

        item.width = match item.resolved.size.width {
            Some(width) => width,
            None if justify == JustifyItems::Stretch
                && !item.replaced
                && item.auto_margins.count(Axis::Horizontal) == 0 =>
            {
                item.resolved.clamp(Axis::Horizontal, free_width)
            }
            None => item.resolved.clamp(
                Axis::Horizontal,
                fit_content(item.min_content_width, item.max_content_width, free_width),
            ),
        };

        let height = intrinsic::height_at_width(ctx, item.node, item.width, inner_size);
        item.height = height;
        let contribution = height + item.margin.vertical();
        row_items.push(TrackItem {
            slots: item.row_slots.clone(),
            min_content: contribution,
            max_content: contribution,
            minimum: minimum_contribution(item, child_style, Axis::Vertical, contribution),
        });
    }
    // An auto height is indefinite for row sizing, whatever space the parent offers.
    let row_space = match available.height {
        AvailableSpace::Definite(_) if inner_size.height.is_none() => AvailableSpace::MaxContent,
        space => space,
    };
    size_tracks(
        Axis::Vertical,
        &mut rows,
        &row_items,
        row_space,
        style.align_content == AlignContent::Stretch,
        config,
    );

    let row_total: f32 = rows.iter().map(|track| track.base_size).sum();
    let inner_height = inner_size
        .height
        .unwrap_or_else(|| resolved.clamp(Axis::Vertical, row_total + pb.vertical()) - pb.vertical());
    position_tracks(
        &mut rows,
        inner_height,
        DistributionMode::from_align_content(style.align_content, false),
    );

    let size = Size::new(inner_width + pb.horizontal(), inner_height + pb.vertical());
    debug!(
        node = %node,
        items = items.len(),
        columns = column_counts.len(),
        rows = row_counts.len(),
        width = size.width,
        height = size.height,
        "grid layout"
    );

    // Step 4: align items in their areas
    let mut overflow = OverflowTracker::new(size, &pb);
    if input.run_mode == RunMode::PerformLayout {
        let parent_size = Size::new(Some(inner_width), Some(inner_height));
        for item in &items {
            let child_style = tree.style(item.node);
            let (area_x, area_width) = area(&columns, &item.column_slots);
            let (area_y, area_height) = area(&rows, &item.row_slots);

            let align = child_style.align_self.or_items(style.align_items);
            let stretch_height = align == AlignItems::Stretch
                && item.resolved.size.height.is_none()
                && !item.replaced
                && item.auto_margins.count(Axis::Vertical) == 0;
            let height = if stretch_height {
                item.resolved
                    .clamp(Axis::Vertical, area_height - item.margin.vertical())
            } else {
                item.height
            };

            let justify = DistributionMode::from_justify_items(child_style.justify_self.or_items(style.justify_items));
            let x = area_x
                + item.margin.left
                + self_offset(
                    area_width - item.width - item.margin.horizontal(),
                    item.auto_margins.left,
                    item.auto_margins.right,
                    justify,
                );
            let y = area_y
                + item.margin.top
                + self_offset(
                    area_height - height - item.margin.vertical(),
                    item.auto_margins.top,
                    item.auto_margins.bottom,
                    DistributionMode::from_align_items(align, false),
                );

            trace!(node = %item.node, x, y, width = item.width, height, "grid item");
            place_child(
                ctx,
                item.node,
                Size::new(x, y),
                Size::new(item.width, height),
                parent_size,
                &item.margin,
                &mut overflow,
            );
        }
    }

    ComputedLayout {
        size,
        content_size: overflow.finish(),
    }
}

/// Offset of an item inside its area. Auto margins take the free space
/// before self-alignment does.
fn self_offset(free: f32, start_auto: bool, end_auto: bool, mode: DistributionMode) -> f32 {
    match (start_auto, end_auto) {
        (true, true) => free.max(0.0) / 2.0,
        (true, false) => free.max(0.0),
        (false, true) => 0.0,
        (false, false) => align_single(free, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::layout_node;
    use crate::config::LayoutConfig;
    use crate::geometry::GeometryResult;
    use crate::tree::BoxTree;
    use rustkit_style::{
        GridLine, GridTemplate, GridTemplateAreas, JustifySelf, SizingFunction, TrackDefinition, TrackRepeat,
        TrackSizingFunction,
    };
    use rustkit_text::ApproximateMeasurer;

    fn sized(width: f32, height: f32) -> BoxStyle {
        BoxStyle {
            width: if width > 0.0 {
                SizingFunction::Length(width)
            } else {
                SizingFunction::Auto
            },
            height: SizingFunction::Length(height),
            ..BoxStyle::new()
        }
    }

    fn run(tree: &BoxTree, root: NodeId, width: f32) -> (ComputedLayout, Vec<Option<GeometryResult>>) {
        let config = LayoutConfig::default();
        let measurer = ApproximateMeasurer::default();
        let mut ctx = LayoutContext::new(tree, &config, &measurer);
        let layout = layout_node(
            &mut ctx,
            root,
            LayoutInput {
                known_size: Size::new(Some(width), None),
                parent_size: Size::NONE,
                available_space: Size::new(AvailableSpace::Definite(width), AvailableSpace::MaxContent),
                run_mode: RunMode::PerformLayout,
            },
        );
        let (geometry, _, _) = ctx.into_parts();
        (layout, geometry)
    }

    fn rect(geometry: &[Option<GeometryResult>], node: NodeId) -> (f32, f32, f32, f32) {
        let g = geometry[node.index()].expect("node was laid out");
        (g.x, g.y, g.width, g.height)
    }

    #[test]
    fn test_fr_columns_split_width() {
        let mut tree = BoxTree::new();
        let a = tree.container(sized(0.0, 20.0));
        let b = tree.container(sized(0.0, 20.0));
        let style = BoxStyle::grid(
            GridTemplate::from_sizes([SizingFunction::Fr(1.0), SizingFunction::Fr(2.0)]),
            GridTemplate::none(),
        );
        let root = tree.with_children(style, &[a, b]).unwrap();

        let (layout, geometry) = run(&tree, root, 300.0);
        assert_eq!(layout.size, Size::new(300.0, 20.0));
        assert_eq!(rect(&geometry, a), (0.0, 0.0, 100.0, 20.0));
        assert_eq!(rect(&geometry, b), (100.0, 0.0, 200.0, 20.0));
    }

    #[test]
    fn test_justify_content_center_with_gap() {
        let mut tree = BoxTree::new();
        let first = tree.container(sized(0.0, 10.0));
        let second = tree.container(BoxStyle {
            justify_self: JustifySelf::Center,
            grid_placement: GridPlacement::cell(1, 2),
            ..sized(20.0, 10.0)
        });
        let style = BoxStyle {
            column_gap: Length::Px(10.0),
            justify_content: JustifyContent::Center,
            ..BoxStyle::grid(
                GridTemplate::from_sizes([SizingFunction::Length(50.0), SizingFunction::Length(50.0)]),
                GridTemplate::none(),
            )
        };
        let root = tree.with_children(style, &[first, second]).unwrap();

        let (_, geometry) = run(&tree, root, 200.0);
        // 110 of tracks and gap centered in 200
        assert_eq!(rect(&geometry, first), (45.0, 0.0, 50.0, 10.0));
        assert_eq!(rect(&geometry, second), (120.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_named_areas() {
        let mut tree = BoxTree::new();
        let head = tree.container(BoxStyle {
            grid_placement: GridPlacement::from_area("head"),
            ..BoxStyle::new()
        });
        let side = tree.container(BoxStyle {
            grid_placement: GridPlacement::from_area("side"),
            ..BoxStyle::new()
        });
        let main = tree.container(BoxStyle {
            grid_placement: GridPlacement::from_area("main"),
            ..sized(0.0, 50.0)
        });
        let style = BoxStyle {
            grid_template_areas: Some(
                GridTemplateAreas::from_rows([["head", "head"], ["side", "main"]]).unwrap(),
            ),
            ..BoxStyle::grid(
                GridTemplate::from_sizes([SizingFunction::Length(100.0), SizingFunction::Fr(1.0)]),
                GridTemplate::from_sizes([SizingFunction::Length(30.0), SizingFunction::Auto]),
            )
        };
        let root = tree.with_children(style, &[main, side, head]).unwrap();

        let (layout, geometry) = run(&tree, root, 400.0);
        assert_eq!(layout.size, Size::new(400.0, 80.0));
        assert_eq!(rect(&geometry, head), (0.0, 0.0, 400.0, 30.0));
        assert_eq!(rect(&geometry, side), (0.0, 30.0, 100.0, 50.0));
        assert_eq!(rect(&geometry, main), (100.0, 30.0, 300.0, 50.0));
    }

    #[test]
    fn test_auto_fit_collapses_empty_tracks() {
        let mut tree = BoxTree::new();
        let item = tree.container(sized(0.0, 10.0));
        let repeat = TrackRepeat::AutoFit(vec![TrackDefinition::simple(TrackSizingFunction::px(100.0))]);
        let style = BoxStyle {
            justify_content: JustifyContent::Center,
            ..BoxStyle::grid(GridTemplate::none().with_repeat(0, repeat), GridTemplate::none())
        };
        let root = tree.with_children(style, &[item]).unwrap();

        let (_, geometry) = run(&tree, root, 400.0);
        // three of four tracks collapse, so the one left is centered
        assert_eq!(rect(&geometry, item), (150.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn test_implicit_rows_follow_auto_rows_and_order() {
        let mut tree = BoxTree::new();
        let a = tree.container(BoxStyle::new());
        let b = tree.container(BoxStyle::new());
        let c = tree.container(BoxStyle {
            order: -1,
            ..BoxStyle::new()
        });
        let style = BoxStyle {
            grid_auto_rows: vec![TrackSizingFunction::px(25.0)],
            ..BoxStyle::grid(
                GridTemplate::from_sizes([SizingFunction::Length(50.0), SizingFunction::Length(50.0)]),
                GridTemplate::none(),
            )
        };
        let root = tree.with_children(style, &[a, b, c]).unwrap();

        let (layout, geometry) = run(&tree, root, 100.0);
        assert_eq!(layout.size.height, 50.0);
        assert_eq!(rect(&geometry, c), (0.0, 0.0, 50.0, 25.0));
        assert_eq!(rect(&geometry, a), (50.0, 0.0, 50.0, 25.0));
        assert_eq!(rect(&geometry, b), (0.0, 25.0, 50.0, 25.0));
    }

    #[test]
    fn test_item_alignment_and_auto_margins() {
        let mut tree = BoxTree::new();
        let end = tree.container(BoxStyle {
            align_self: rustkit_style::AlignSelf::End,
            ..sized(20.0, 10.0)
        });
        let centered = tree.container(BoxStyle {
            margin_left: Length::Auto,
            margin_right: Length::Auto,
            margin_top: Length::Auto,
            ..sized(20.0, 10.0)
        });
        let style = BoxStyle::grid(
            GridTemplate::from_sizes([SizingFunction::Length(100.0), SizingFunction::Length(100.0)]),
            GridTemplate::from_sizes([SizingFunction::Length(50.0)]),
        );
        let root = tree.with_children(style, &[end, centered]).unwrap();

        let (_, geometry) = run(&tree, root, 200.0);
        assert_eq!(rect(&geometry, end), (0.0, 40.0, 20.0, 10.0));
        assert_eq!(rect(&geometry, centered), (140.0, 40.0, 20.0, 10.0));
    }

    #[test]
    fn test_intrinsic_widths_sum_columns() {
        let mut tree = BoxTree::new();
        let short = tree.text(BoxStyle::new(), "abc");
        let long = tree.text(BoxStyle::new(), "ab cdef");
        let style = BoxStyle::grid(
            GridTemplate::from_sizes([SizingFunction::Auto, SizingFunction::Auto]),
            GridTemplate::none(),
        );
        let root = tree.with_children(style, &[short, long]).unwrap();

        let config = LayoutConfig::default();
        let measurer = ApproximateMeasurer::default();
        let mut ctx = LayoutContext::new(&tree, &config, &measurer);
        let max = intrinsic::content_size(&mut ctx, root, Axis::Horizontal, IntrinsicSizingMode::MaxContent);
        let min = intrinsic::content_size(&mut ctx, root, Axis::Horizontal, IntrinsicSizingMode::MinContent);
        // 3 + 7 graphemes at 8px; min-content keeps the longest run "cdef"
        assert_eq!(max, 80.0);
        assert_eq!(min, 56.0);
    }

    #[test]
    fn test_spanning_line_numbers() {
        let mut tree = BoxTree::new();
        let wide = tree.container(BoxStyle {
            grid_placement: GridPlacement {
                column_start: GridLine::Number(1),
                column_end: GridLine::Span(2),
                ..GridPlacement::default()
            },
            ..sized(0.0, 10.0)
        });
        let style = BoxStyle {
            column_gap: Length::Px(4.0),
            ..BoxStyle::grid(
                GridTemplate::from_sizes([
                    SizingFunction::Length(30.0),
                    SizingFunction::Length(30.0),
                    SizingFunction::Length(30.0),
                ]),
                GridTemplate::none(),
            )
        };
        let root = tree.with_children(style, &[wide]).unwrap();

        let (_, geometry) = run(&tree, root, 200.0);
        assert_eq!(rect(&geometry, wide), (0.0, 0.0, 64.0, 10.0));
    }
}
