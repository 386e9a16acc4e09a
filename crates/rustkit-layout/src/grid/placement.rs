//! Grid item placement.
//!
//! Resolves each item's `grid-row`/`grid-column` lines and assigns auto
//! positions in three passes, following
//! <https://www.w3.org/TR/css-grid-1/#auto-placement-algo>:
//!
//! 1. items definite on both axes,
//! 2. items definite on the secondary axis only,
//! 3. everything else, from a cursor that moves in primary-axis order.
//!
//! With `grid-auto-flow: row` the primary axis is columns.

use std::collections::HashMap;

use rustkit_style::{GridAutoFlow, GridLine, GridPlacement, GridTemplateAreas};
use tracing::{debug, trace};

use super::occupancy::{CellOccupancyMatrix, CellOccupancyState};
use super::track_counts::{LineSpan, OriginZeroLine, TrackCounts};
use super::tracks::ExplicitTracks;
use crate::geometry::Axis;
use crate::tree::NodeId;

// ==================== Named lines ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineSide {
    Start,
    End,
}

/// Explicit grid lines along one axis and the names attached to them.
#[derive(Debug, Clone, Default)]
pub(crate) struct AxisLines {
    explicit: u16,
    /// Names from the track template, in CSS line numbers.
    names: HashMap<String, Vec<i32>>,
    /// `area-start` / `area-end` names from `grid-template-areas`.
    area_names: HashMap<String, Vec<i32>>,
}

impl AxisLines {
    pub fn new(tracks: &ExplicitTracks, areas: Option<&GridTemplateAreas>, axis: Axis) -> Self {
        let mut names: HashMap<String, Vec<i32>> = HashMap::new();
        for (index, line_names) in tracks.line_names.iter().enumerate() {
            for name in line_names {
                names.entry(name.clone()).or_default().push(index as i32 + 1);
            }
        }

        let mut area_names: HashMap<String, Vec<i32>> = HashMap::new();
        let mut area_tracks = 0;
        if let Some(areas) = areas {
            area_tracks = match axis {
                Axis::Horizontal => areas.column_count(),
                Axis::Vertical => areas.row_count(),
            };
            for area in &areas.areas {
                let (start, end) = match axis {
                    Axis::Horizontal => (area.column_start, area.column_end),
                    Axis::Vertical => (area.row_start, area.row_end),
                };
                area_names.entry(format!("{}-start", area.name)).or_default().push(start);
                area_names.entry(format!("{}-end", area.name)).or_default().push(end);
            }
        }

        let explicit = tracks.len().max(area_tracks);
        Self {
            explicit: u16::try_from(explicit).unwrap_or(u16::MAX),
            names,
            area_names,
        }
    }

    fn counts(&self) -> TrackCounts {
        TrackCounts::from_explicit(self.explicit)
    }

    /// Lines called `name`, falling back to the area line on `side`.
    fn lookup(&self, name: &str, side: LineSide) -> Option<&[i32]> {
        let direct = self.names.get(name).or_else(|| self.area_names.get(name));
        direct
            .or_else(|| {
                let suffixed = match side {
                    LineSide::Start => format!("{}-start", name),
                    LineSide::End => format!("{}-end", name),
                };
                self.names.get(&suffixed).or_else(|| self.area_names.get(&suffixed))
            })
            .map(Vec::as_slice)
    }

    /// The `nth` line called `name`; negative counts from the last one.
    fn named_line(&self, name: &str, nth: i32, side: LineSide) -> Option<OriginZeroLine> {
        let lines = self.lookup(name, side)?;
        let index = match nth {
            0 => return None,
            nth if nth > 0 => usize::try_from(nth - 1).ok()?,
            nth => lines.len().checked_sub(usize::try_from(-nth).ok()?)?,
        };
        let css = *lines.get(index)?;
        self.counts().css_to_origin_zero(css)
    }

    fn line(&self, line: &GridLine, side: LineSide) -> Option<OriginZeroLine> {
        match line {
            GridLine::Number(number) => self.counts().css_to_origin_zero(*number),
            GridLine::Name(name, nth) => self.named_line(name, *nth, side),
            _ => None,
        }
    }

    /// First line called `name` after `from`.
    fn next_named(&self, name: &str, from: OriginZeroLine) -> Option<OriginZeroLine> {
        let counts = self.counts();
        self.lookup(name, LineSide::End)?
            .iter()
            .filter_map(|&css| counts.css_to_origin_zero(css))
            .filter(|&line| line > from)
            .min()
    }

    /// Last line called `name` before `from`.
    fn previous_named(&self, name: &str, from: OriginZeroLine) -> Option<OriginZeroLine> {
        let counts = self.counts();
        self.lookup(name, LineSide::Start)?
            .iter()
            .filter_map(|&css| counts.css_to_origin_zero(css))
            .filter(|&line| line < from)
            .max()
    }

    /// Resolve a start/end pair into a definite span or an auto span size.
    fn resolve(&self, start: &GridLine, end: &GridLine) -> AxisPlacement {
        let span_size = |line: &GridLine| match line {
            GridLine::Span(count) => Some(u16::try_from((*count).max(1)).unwrap_or(u16::MAX)),
            _ => None,
        };

        match (self.line(start, LineSide::Start), self.line(end, LineSide::End)) {
            (Some(start), Some(end)) => {
                let span = match start.cmp(&end) {
                    std::cmp::Ordering::Less => LineSpan::new(start, end),
                    std::cmp::Ordering::Greater => LineSpan::new(end, start),
                    std::cmp::Ordering::Equal => LineSpan::from_start(start, 1),
                };
                AxisPlacement::Definite(span)
            }
            (Some(start), None) => AxisPlacement::Definite(match end {
                GridLine::Span(_) => LineSpan::from_start(start, span_size(end).unwrap_or(1)),
                GridLine::SpanName(name) => match self.next_named(name, start) {
                    Some(end) => LineSpan::new(start, end),
                    None => LineSpan::from_start(start, 1),
                },
                _ => LineSpan::from_start(start, 1),
            }),
            (None, Some(end)) => AxisPlacement::Definite(match start {
                GridLine::Span(_) => {
                    let span = span_size(start).unwrap_or(1);
                    LineSpan::new(end.offset(-i32::from(span)), end)
                }
                GridLine::SpanName(name) => match self.previous_named(name, end) {
                    Some(start) => LineSpan::new(start, end),
                    None => LineSpan::new(end.offset(-1), end),
                },
                _ => LineSpan::new(end.offset(-1), end),
            }),
            (None, None) => AxisPlacement::Auto {
                // a span on the end side is ignored when the start is a span too
                span: span_size(start).or_else(|| span_size(end)).unwrap_or(1),
            },
        }
    }
}

/// Placement of an item along one axis before auto placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisPlacement {
    Definite(LineSpan),
    Auto { span: u16 },
}

impl AxisPlacement {
    fn definite(self) -> Option<LineSpan> {
        match self {
            AxisPlacement::Definite(span) => Some(span),
            AxisPlacement::Auto { .. } => None,
        }
    }

    fn span(self) -> u16 {
        match self {
            AxisPlacement::Definite(span) => span.span(),
            AxisPlacement::Auto { span } => span,
        }
    }
}

// ==================== Auto placement ====================

/// A grid item with its final area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlacedItem {
    pub node: NodeId,
    pub rows: LineSpan,
    pub columns: LineSpan,
}

/// Result of placing every item of one container.
#[derive(Debug, Clone)]
pub(crate) struct GridPlacementOutput {
    /// Items in the order they were given.
    pub items: Vec<PlacedItem>,
    pub occupancy: CellOccupancyMatrix,
}

impl GridPlacementOutput {
    pub fn rows(&self) -> TrackCounts {
        self.occupancy.rows()
    }

    pub fn columns(&self) -> TrackCounts {
        self.occupancy.columns()
    }
}

/// Primary/secondary view of the occupancy matrix.
struct FlowGrid {
    matrix: CellOccupancyMatrix,
    row_flow: bool,
}

impl FlowGrid {
    fn primary(&self) -> TrackCounts {
        if self.row_flow {
            self.matrix.columns()
        } else {
            self.matrix.rows()
        }
    }

    fn secondary(&self) -> TrackCounts {
        if self.row_flow {
            self.matrix.rows()
        } else {
            self.matrix.columns()
        }
    }

    /// (rows, columns) of a primary/secondary pair.
    fn area(&self, primary: LineSpan, secondary: LineSpan) -> (LineSpan, LineSpan) {
        if self.row_flow {
            (secondary, primary)
        } else {
            (primary, secondary)
        }
    }

    fn is_free(&self, primary: LineSpan, secondary: LineSpan) -> bool {
        let (rows, columns) = self.area(primary, secondary);
        self.matrix.area_is_unoccupied(rows, columns)
    }

    fn include_primary(&mut self, span: LineSpan) {
        if self.row_flow {
            self.matrix.include_columns(span);
        } else {
            self.matrix.include_rows(span);
        }
    }

    fn mark(&mut self, node: NodeId, primary: LineSpan, secondary: LineSpan, state: CellOccupancyState) -> PlacedItem {
        let (rows, columns) = self.area(primary, secondary);
        if let Err(conflict) = self.matrix.try_mark_area(rows, columns, state) {
            debug!(node = %node, %conflict, "grid area overlaps a placed item");
        }
        trace!(node = %node, %rows, %columns, ?state, "placed grid item");
        PlacedItem { node, rows, columns }
    }
}

/// Resolve and auto-place `items` (in `order`-sorted document order).
pub(crate) fn place_items(
    items: &[(NodeId, &GridPlacement)],
    columns: &AxisLines,
    rows: &AxisLines,
    flow: GridAutoFlow,
    max_steps: usize,
) -> GridPlacementOutput {
    let row_flow = flow.is_row();
    let dense = flow.is_dense();

    // (primary, secondary) per item
    let resolved: Vec<(AxisPlacement, AxisPlacement)> = items
        .iter()
        .map(|(_, placement)| {
            let column = columns.resolve(&placement.column_start, &placement.column_end);
            let row = rows.resolve(&placement.row_start, &placement.row_end);
            if row_flow {
                (column, row)
            } else {
                (row, column)
            }
        })
        .collect();

    let mut grid = FlowGrid {
        matrix: CellOccupancyMatrix::new(rows.counts(), columns.counts()),
        row_flow,
    };
    let mut placed: Vec<Option<PlacedItem>> = vec![None; items.len()];

    // Pass 1: both axes definite.
    for (index, &(primary, secondary)) in resolved.iter().enumerate() {
        if let (Some(primary), Some(secondary)) = (primary.definite(), secondary.definite()) {
            let node = items[index].0;
            placed[index] = Some(grid.mark(node, primary, secondary, CellOccupancyState::DefinitelyPlaced));
        }
    }

    // Pass 2: secondary axis definite, searched along the primary axis.
    let mut lane_cursors: HashMap<LineSpan, OriginZeroLine> = HashMap::new();
    for (index, &(primary, secondary)) in resolved.iter().enumerate() {
        let (AxisPlacement::Auto { span }, Some(secondary)) = (primary, secondary.definite()) else {
            continue;
        };
        let node = items[index].0;
        let origin = grid.primary().implicit_start_line();
        let mut start = if dense {
            origin
        } else {
            lane_cursors.get(&secondary).copied().unwrap_or(origin)
        };

        let mut steps = 0;
        while !grid.is_free(LineSpan::from_start(start, span), secondary) && steps < max_steps {
            start = start.offset(1);
            steps += 1;
        }
        if steps >= max_steps {
            debug!(node = %node, steps, "grid placement search exhausted");
        }

        let area = LineSpan::from_start(start, span);
        lane_cursors.insert(secondary, area.end);
        placed[index] = Some(grid.mark(node, area, secondary, CellOccupancyState::AutoPlaced));
    }

    // The primary axis is fixed from here on: make room for every
    // remaining definite span and for the widest auto span.
    let mut widest = 1;
    for (index, &(primary, _)) in resolved.iter().enumerate() {
        if placed[index].is_some() {
            continue;
        }
        match primary {
            AxisPlacement::Definite(span) => grid.include_primary(span),
            AxisPlacement::Auto { span } => widest = widest.max(span),
        }
    }
    let origin = grid.primary().implicit_start_line();
    grid.include_primary(LineSpan::from_start(origin, widest));

    // Pass 3: primary axis definite or fully auto.
    let primary_start = grid.primary().implicit_start_line();
    let primary_end = grid.primary().implicit_end_line();
    let secondary_start = grid.secondary().implicit_start_line();
    let mut cursor = (primary_start, secondary_start);

    for (index, &(primary, secondary)) in resolved.iter().enumerate() {
        if placed[index].is_some() {
            continue;
        }
        let node = items[index].0;
        let secondary_span = secondary.span();
        let mut steps = 0;

        let area = match primary {
            AxisPlacement::Definite(primary) => {
                let mut lane = if dense {
                    secondary_start
                } else if primary.start < cursor.0 {
                    cursor.1.offset(1)
                } else {
                    cursor.1
                };
                while !grid.is_free(primary, LineSpan::from_start(lane, secondary_span)) && steps < max_steps {
                    lane = lane.offset(1);
                    steps += 1;
                }
                (primary, LineSpan::from_start(lane, secondary_span))
            }
            AxisPlacement::Auto { span } => {
                let (mut start, mut lane) = if dense {
                    (primary_start, secondary_start)
                } else {
                    cursor
                };
                loop {
                    if steps >= max_steps {
                        // park the item past every placed row of the flow
                        start = primary_start;
                        lane = grid.secondary().implicit_end_line();
                        break;
                    }
                    steps += 1;
                    let candidate = LineSpan::from_start(start, span);
                    if candidate.end > primary_end {
                        start = primary_start;
                        lane = lane.offset(1);
                        continue;
                    }
                    if grid.is_free(candidate, LineSpan::from_start(lane, secondary_span)) {
                        break;
                    }
                    start = start.offset(1);
                }
                (LineSpan::from_start(start, span), LineSpan::from_start(lane, secondary_span))
            }
        };
        if steps >= max_steps {
            debug!(node = %node, steps, "grid placement search exhausted");
        }

        cursor = (area.0.end, area.1.start);
        placed[index] = Some(grid.mark(node, area.0, area.1, CellOccupancyState::AutoPlaced));
    }

    let items: Vec<PlacedItem> = placed.into_iter().flatten().collect();
    debug!(
        items = items.len(),
        rows = grid.matrix.rows().len(),
        columns = grid.matrix.columns().len(),
        dense,
        "grid placement"
    );

    GridPlacementOutput {
        items,
        occupancy: grid.matrix,
    }
}
