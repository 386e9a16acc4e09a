//! # RustKit Style
//!
//! Resolved style values for the RustKit layout resolver.
//!
//! Everything in this crate has already been through the cascade: lengths are
//! pixels or percentages, keywords are enums, and grid templates are lists of
//! typed track definitions. Layout consumes these values directly and never
//! parses text.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while building style values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("grid-template-areas row {row} has {found} cells, expected {expected}")]
    RaggedAreaRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("grid area '{0}' is not a rectangle")]
    NonRectangularArea(String),
}

// ==================== Lengths ====================

/// A length used for margins, padding, borders and gaps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    /// Pixels.
    Px(f32),
    /// Percentage (0..=100) of the containing block's inline size.
    Percent(f32),
    /// Auto. Only margins give this a meaning.
    Auto,
    /// Zero.
    #[default]
    Zero,
}

impl Length {
    /// Compute the absolute pixel value. `Auto` computes to zero.
    pub fn to_px(self, percent_basis: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => pct / 100.0 * percent_basis,
            Length::Auto | Length::Zero => 0.0,
        }
    }

    /// Resolve against a possibly indefinite basis. Percentages of an
    /// indefinite basis compute to zero.
    pub fn resolve(self, percent_basis: Option<f32>) -> f32 {
        match self {
            Length::Percent(pct) => percent_basis.map_or(0.0, |basis| pct / 100.0 * basis),
            other => other.to_px(0.0),
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Length::Auto)
    }
}

/// A sizing function, as used by `width`/`height`, their min/max clamps,
/// and grid track definitions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizingFunction {
    /// Fixed length in pixels.
    Length(f32),
    /// Percentage (0..=100) of the containing block.
    Percent(f32),
    #[default]
    Auto,
    MinContent,
    MaxContent,
    /// `fit-content(limit)` with the limit in pixels.
    FitContent(f32),
    /// Flexible factor. Only meaningful in grid track definitions.
    Fr(f32),
}

impl SizingFunction {
    /// Resolve to pixels if the value is definite against `percent_basis`.
    pub fn resolve(self, percent_basis: Option<f32>) -> Option<f32> {
        match self {
            SizingFunction::Length(px) => Some(px),
            SizingFunction::Percent(pct) => percent_basis.map(|basis| pct / 100.0 * basis),
            _ => None,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, SizingFunction::Auto)
    }

    /// Check if this is a content-based keyword (`auto`, `min-content`,
    /// `max-content` or `fit-content()`).
    pub fn is_intrinsic(self) -> bool {
        matches!(
            self,
            SizingFunction::Auto
                | SizingFunction::MinContent
                | SizingFunction::MaxContent
                | SizingFunction::FitContent(_)
        )
    }

    /// Check if this is a flexible (`fr`) value.
    pub fn is_flexible(self) -> bool {
        matches!(self, SizingFunction::Fr(_))
    }

    /// The flex factor, or zero for non-flexible values.
    pub fn flex_factor(self) -> f32 {
        match self {
            SizingFunction::Fr(fr) => fr.max(0.0),
            _ => 0.0,
        }
    }
}

// ==================== Box Model Types ====================

/// Display property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Flex,
    Grid,
    None,
}

impl Display {
    /// Check if this is a flex container.
    pub fn is_flex(self) -> bool {
        matches!(self, Display::Flex)
    }

    /// Check if this is a grid container.
    pub fn is_grid(self) -> bool {
        matches!(self, Display::Grid)
    }
}

/// Position property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    /// Out-of-flow boxes are skipped by flex and grid layout.
    pub fn is_out_of_flow(self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}

/// Overflow behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    /// Check if this overflow creates a scroll container.
    pub fn is_scroll_container(self) -> bool {
        !matches!(self, Overflow::Visible)
    }
}

/// Box sizing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxSizing {
    #[default]
    ContentBox,
    BorderBox,
}

// ==================== Flexbox Types ====================

/// Flex direction property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    /// Check if this direction is reversed.
    pub fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }

    /// Check if this is a row direction.
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    /// Check if this is a column direction.
    pub fn is_column(self) -> bool {
        !self.is_row()
    }
}

/// Flex wrap property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn is_wrapping(self) -> bool {
        !matches!(self, FlexWrap::NoWrap)
    }
}

/// Justify content property (main axis / inline axis distribution).
///
/// `Start`/`End` ignore `flex-direction` reversal, `FlexStart`/`FlexEnd`
/// follow it. In grid both pairs mean the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    Stretch,
}

/// Align items property (cross axis alignment for all items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Start,
    End,
    Center,
    Baseline,
}

/// Align content property (multi-line cross axis alignment, grid row tracks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignContent {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Align self property (cross axis alignment for individual item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    FlexStart,
    FlexEnd,
    Start,
    End,
    Center,
    Baseline,
    Stretch,
}

impl AlignSelf {
    /// Resolve `auto` against the container's `align-items`.
    pub fn or_items(self, items: AlignItems) -> AlignItems {
        match self {
            AlignSelf::Auto => items,
            AlignSelf::FlexStart => AlignItems::FlexStart,
            AlignSelf::FlexEnd => AlignItems::FlexEnd,
            AlignSelf::Start => AlignItems::Start,
            AlignSelf::End => AlignItems::End,
            AlignSelf::Center => AlignItems::Center,
            AlignSelf::Baseline => AlignItems::Baseline,
            AlignSelf::Stretch => AlignItems::Stretch,
        }
    }
}

/// Flex basis property.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FlexBasis {
    /// Use the item's main size property (width or height).
    #[default]
    Auto,
    /// Size based on content.
    Content,
    /// Explicit length.
    Length(f32),
    /// Percentage of container.
    Percent(f32),
}

// ==================== Grid Types ====================

/// A grid track size as a (min, max) pair of sizing functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSizingFunction {
    pub min: SizingFunction,
    pub max: SizingFunction,
}

impl Default for TrackSizingFunction {
    fn default() -> Self {
        SizingFunction::Auto.into()
    }
}

impl From<SizingFunction> for TrackSizingFunction {
    /// Expand a single-value track size into its (min, max) pair.
    fn from(size: SizingFunction) -> Self {
        match size {
            SizingFunction::Fr(_) | SizingFunction::FitContent(_) => Self {
                min: SizingFunction::Auto,
                max: size,
            },
            _ => Self { min: size, max: size },
        }
    }
}

impl TrackSizingFunction {
    /// Create a fixed pixel size.
    pub fn px(value: f32) -> Self {
        SizingFunction::Length(value).into()
    }

    /// Create a fractional size.
    pub fn fr(value: f32) -> Self {
        SizingFunction::Fr(value).into()
    }

    /// Create a `minmax(min, max)` constraint. An `fr` minimum is invalid in
    /// CSS and is treated as `auto`.
    pub fn minmax(min: SizingFunction, max: SizingFunction) -> Self {
        let min = if min.is_flexible() { SizingFunction::Auto } else { min };
        Self { min, max }
    }

    /// Check if this is a flexible track (max function is `fr`).
    pub fn is_flexible(&self) -> bool {
        self.max.is_flexible()
    }
}

/// A grid track definition (for grid-template-columns/rows).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackDefinition {
    /// Track sizing.
    pub size: TrackSizingFunction,
    /// Line name(s) before this track.
    pub line_names: Vec<String>,
}

impl TrackDefinition {
    /// Create a simple track without line names.
    pub fn simple(size: impl Into<TrackSizingFunction>) -> Self {
        Self {
            size: size.into(),
            line_names: Vec::new(),
        }
    }

    /// Create a track with a line name before it.
    pub fn named(size: impl Into<TrackSizingFunction>, name: &str) -> Self {
        Self {
            size: size.into(),
            line_names: vec![name.to_string()],
        }
    }
}

/// Repeat function for grid tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackRepeat {
    /// Repeat a fixed number of times. Negative counts produce no tracks.
    Count(i32, Vec<TrackDefinition>),
    /// Auto-fill: as many as fit.
    AutoFill(Vec<TrackDefinition>),
    /// Auto-fit: as many as fit, collapsing empty tracks.
    AutoFit(Vec<TrackDefinition>),
}

impl TrackRepeat {
    /// The repeated track list.
    pub fn tracks(&self) -> &[TrackDefinition] {
        match self {
            TrackRepeat::Count(_, tracks)
            | TrackRepeat::AutoFill(tracks)
            | TrackRepeat::AutoFit(tracks) => tracks,
        }
    }

    pub fn is_auto(&self) -> bool {
        !matches!(self, TrackRepeat::Count(..))
    }
}

/// Grid template definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridTemplate {
    /// Explicit track definitions.
    pub tracks: Vec<TrackDefinition>,
    /// Repeat patterns.
    pub repeats: Vec<(usize, TrackRepeat)>, // (insert_position, repeat)
    /// Final line names.
    pub final_line_names: Vec<String>,
}

impl GridTemplate {
    /// Create an empty template (no explicit tracks).
    pub fn none() -> Self {
        Self::default()
    }

    /// Create from a list of track sizes.
    pub fn from_sizes(sizes: impl IntoIterator<Item = SizingFunction>) -> Self {
        Self {
            tracks: sizes.into_iter().map(TrackDefinition::simple).collect(),
            ..Self::default()
        }
    }

    /// Insert a repeat pattern before the track at `position`.
    pub fn with_repeat(mut self, position: usize, repeat: TrackRepeat) -> Self {
        self.repeats.push((position, repeat));
        self
    }

    /// Check if the template contains an `auto-fill`/`auto-fit` repeat.
    pub fn has_auto_repeat(&self) -> bool {
        self.repeats.iter().any(|(_, r)| r.is_auto())
    }
}

/// Named grid area, in 1-based line numbers (end exclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct GridArea {
    pub name: String,
    pub row_start: i32,
    pub row_end: i32,
    pub column_start: i32,
    pub column_end: i32,
}

/// Grid template areas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridTemplateAreas {
    /// Cells per row, `None` for `.` cells.
    pub rows: Vec<Vec<Option<String>>>,
    /// Named areas derived from rows.
    pub areas: Vec<GridArea>,
}

impl GridTemplateAreas {
    /// Build areas from already-tokenized rows (`"."` marks an empty cell).
    pub fn from_rows<R, C>(rows: R) -> Result<Self, StyleError>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows: Vec<Vec<Option<String>>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell.as_ref() {
                        "." => None,
                        name => Some(name.to_string()),
                    })
                    .collect()
            })
            .collect();

        let columns = rows.first().map_or(0, Vec::len);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != columns {
                return Err(StyleError::RaggedAreaRows {
                    row,
                    expected: columns,
                    found: cells.len(),
                });
            }
        }

        // name -> (min_row, max_row, min_col, max_col, cell_count)
        let mut extents: HashMap<&str, (usize, usize, usize, usize, usize)> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for (r, cells) in rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let Some(name) = cell.as_deref() else {
                    continue;
                };
                let entry = extents.entry(name).or_insert_with(|| {
                    order.push(name);
                    (r, r, c, c, 0)
                });
                entry.0 = entry.0.min(r);
                entry.1 = entry.1.max(r);
                entry.2 = entry.2.min(c);
                entry.3 = entry.3.max(c);
                entry.4 += 1;
            }
        }

        let mut areas = Vec::with_capacity(order.len());
        for name in order {
            let (r0, r1, c0, c1, count) = extents[name];
            if (r1 - r0 + 1) * (c1 - c0 + 1) != count {
                return Err(StyleError::NonRectangularArea(name.to_string()));
            }
            areas.push(GridArea {
                name: name.to_string(),
                row_start: r0 as i32 + 1,
                row_end: r1 as i32 + 2,
                column_start: c0 as i32 + 1,
                column_end: c1 as i32 + 2,
            });
        }

        debug!(rows = rows.len(), columns, areas = areas.len(), "Built grid template areas");
        Ok(Self { rows, areas })
    }

    /// Get area by name.
    pub fn get_area(&self, name: &str) -> Option<&GridArea> {
        self.areas.iter().find(|a| a.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Grid auto flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAutoFlow {
    #[default]
    Row,
    Column,
    RowDense,
    ColumnDense,
}

impl GridAutoFlow {
    /// Check if this is a row-based flow.
    pub fn is_row(self) -> bool {
        matches!(self, GridAutoFlow::Row | GridAutoFlow::RowDense)
    }

    /// Check if this uses dense packing.
    pub fn is_dense(self) -> bool {
        matches!(self, GridAutoFlow::RowDense | GridAutoFlow::ColumnDense)
    }
}

/// Grid line reference (for grid-column-start, etc.).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GridLine {
    /// Auto placement.
    #[default]
    Auto,
    /// Specific line number (1-based, can be negative).
    Number(i32),
    /// Named line, optionally the nth occurrence (1-based, negative counts from the end).
    Name(String, i32),
    /// Span a number of tracks.
    Span(u32),
    /// Span to the next line with this name.
    SpanName(String),
}

impl GridLine {
    /// Shorthand for the first line called `name`.
    pub fn name(name: &str) -> Self {
        GridLine::Name(name.to_string(), 1)
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, GridLine::Auto)
    }

    pub fn is_span(&self) -> bool {
        matches!(self, GridLine::Span(_) | GridLine::SpanName(_))
    }
}

/// Grid placement for an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridPlacement {
    /// Column start line.
    pub column_start: GridLine,
    /// Column end line.
    pub column_end: GridLine,
    /// Row start line.
    pub row_start: GridLine,
    /// Row end line.
    pub row_end: GridLine,
}

impl GridPlacement {
    /// Create placement from a named area.
    pub fn from_area(name: &str) -> Self {
        Self {
            column_start: GridLine::name(&format!("{}-start", name)),
            column_end: GridLine::name(&format!("{}-end", name)),
            row_start: GridLine::name(&format!("{}-start", name)),
            row_end: GridLine::name(&format!("{}-end", name)),
        }
    }

    /// Create placement from explicit lines.
    pub fn from_lines(col_start: i32, col_end: i32, row_start: i32, row_end: i32) -> Self {
        Self {
            column_start: GridLine::Number(col_start),
            column_end: GridLine::Number(col_end),
            row_start: GridLine::Number(row_start),
            row_end: GridLine::Number(row_end),
        }
    }

    /// Place at a single cell (1-based row and column).
    pub fn cell(row: i32, column: i32) -> Self {
        Self::from_lines(column, column + 1, row, row + 1)
    }
}

/// Justify items (inline-axis alignment in grid areas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyItems {
    #[default]
    Stretch,
    Start,
    End,
    Center,
}

/// Justify self (inline-axis alignment for individual item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifySelf {
    #[default]
    Auto,
    Stretch,
    Start,
    End,
    Center,
}

impl JustifySelf {
    /// Resolve `auto` against the container's `justify-items`.
    pub fn or_items(self, items: JustifyItems) -> JustifyItems {
        match self {
            JustifySelf::Auto => items,
            JustifySelf::Stretch => JustifyItems::Stretch,
            JustifySelf::Start => JustifyItems::Start,
            JustifySelf::End => JustifyItems::End,
            JustifySelf::Center => JustifyItems::Center,
        }
    }
}

// ==================== Box Style ====================

/// The resolved style of one box, as seen by layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStyle {
    // Box model
    pub display: Display,
    pub position: Position,
    pub box_sizing: BoxSizing,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub width: SizingFunction,
    pub height: SizingFunction,
    pub min_width: SizingFunction,
    pub min_height: SizingFunction,
    /// `Auto` means no maximum.
    pub max_width: SizingFunction,
    pub max_height: SizingFunction,

    // Margin
    pub margin_top: Length,
    pub margin_right: Length,
    pub margin_bottom: Length,
    pub margin_left: Length,

    // Padding
    pub padding_top: Length,
    pub padding_right: Length,
    pub padding_bottom: Length,
    pub padding_left: Length,

    // Border
    pub border_top_width: Length,
    pub border_right_width: Length,
    pub border_bottom_width: Length,
    pub border_left_width: Length,

    // Text
    pub font_size: f32,
    /// Multiplier of `font_size`.
    pub line_height: f32,

    // Flex container
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    pub row_gap: Length,
    pub column_gap: Length,

    // Flex item
    pub order: i32,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: FlexBasis,
    pub align_self: AlignSelf,

    // Grid container
    pub grid_template_columns: GridTemplate,
    pub grid_template_rows: GridTemplate,
    pub grid_template_areas: Option<GridTemplateAreas>,
    /// Cycled over implicit columns.
    pub grid_auto_columns: Vec<TrackSizingFunction>,
    /// Cycled over implicit rows.
    pub grid_auto_rows: Vec<TrackSizingFunction>,
    pub grid_auto_flow: GridAutoFlow,
    pub justify_items: JustifyItems,

    // Grid item
    pub grid_placement: GridPlacement,
    pub justify_self: JustifySelf,
}

impl BoxStyle {
    /// Create default style.
    pub fn new() -> Self {
        Self {
            font_size: 16.0,
            line_height: 1.2,
            // Flexbox item defaults
            flex_shrink: 1.0, // Default is 1, not 0
            ..Default::default()
        }
    }

    /// A flex container with the given direction.
    pub fn flex(direction: FlexDirection) -> Self {
        Self {
            display: Display::Flex,
            flex_direction: direction,
            ..Self::new()
        }
    }

    /// A grid container with the given column and row templates.
    pub fn grid(columns: GridTemplate, rows: GridTemplate) -> Self {
        Self {
            display: Display::Grid,
            grid_template_columns: columns,
            grid_template_rows: rows,
            ..Self::new()
        }
    }

    /// Set all four margins.
    pub fn with_margin(mut self, margin: Length) -> Self {
        self.margin_top = margin;
        self.margin_right = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self
    }

    /// Set all four paddings.
    pub fn with_padding(mut self, padding: Length) -> Self {
        self.padding_top = padding;
        self.padding_right = padding;
        self.padding_bottom = padding;
        self.padding_left = padding;
        self
    }

    /// Set all four border widths.
    pub fn with_border(mut self, width: Length) -> Self {
        self.border_top_width = width;
        self.border_right_width = width;
        self.border_bottom_width = width;
        self.border_left_width = width;
        self
    }

    /// Set both gaps.
    pub fn with_gap(mut self, gap: Length) -> Self {
        self.row_gap = gap;
        self.column_gap = gap;
        self
    }

    /// Used line height in pixels.
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}
