//! Grid tracks: template expansion and the track list.
//!
//! The track list interleaves gutters with tracks: `2n + 1` entries with a
//! gutter at both ends, so track `i` lives at `2i + 1`. Outer gutters and
//! gutters next to collapsed tracks have zero size.

use std::ops::Range;

use rustkit_style::{GridTemplate, SizingFunction, TrackDefinition, TrackRepeat, TrackSizingFunction};
use tracing::trace;

use super::track_counts::{OriginZeroLine, TrackCounts};

/// Explicit tracks of one axis after `repeat()` expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ExplicitTracks {
    pub sizes: Vec<TrackSizingFunction>,
    /// Names of each line; one more entry than `sizes`.
    pub line_names: Vec<Vec<String>>,
    /// Tracks produced by an `auto-fit` repeat.
    pub auto_fit: Option<Range<usize>>,
}

impl ExplicitTracks {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }
}

/// Size of a track definition that is known without looking at content.
fn fixed_size(size: &TrackSizingFunction, basis: Option<f32>) -> Option<f32> {
    let resolve = |value: SizingFunction| match value {
        SizingFunction::Length(_) | SizingFunction::Percent(_) => value.resolve(basis),
        _ => None,
    };
    resolve(size.max).or_else(|| resolve(size.min))
}

/// Number of repetitions of an auto repeat.
///
/// `space` is the definite inner size, or the definite max size when the
/// container size is indefinite.
fn auto_repeat_count(
    template: &GridTemplate,
    repeat: &[TrackDefinition],
    space: Option<f32>,
    gap: f32,
) -> usize {
    let Some(space) = space else {
        return 1;
    };

    let other: f32 = template
        .tracks
        .iter()
        .chain(
            template
                .repeats
                .iter()
                .filter(|(_, r)| !r.is_auto())
                .flat_map(|(_, r)| {
                    let times = match r {
                        TrackRepeat::Count(count, _) => (*count).max(0) as usize,
                        _ => 0,
                    };
                    std::iter::repeat(r.tracks()).take(times).flatten()
                }),
        )
        .map(|def| fixed_size(&def.size, Some(space)).unwrap_or(0.0) + gap)
        .sum();

    let unit: f32 = repeat
        .iter()
        .map(|def| fixed_size(&def.size, Some(space)).unwrap_or(0.0) + gap)
        .sum();
    if unit <= gap * repeat.len() as f32 || !unit.is_finite() {
        return 1;
    }

    let free = space - other + gap;
    ((free / unit).floor().max(1.0)) as usize
}

/// Expand `template` into its explicit tracks.
pub(crate) fn expand_template(template: &GridTemplate, space: Option<f32>, gap: f32) -> ExplicitTracks {
    let mut expanded = ExplicitTracks::default();
    let mut seen_auto = false;

    let push = |expanded: &mut ExplicitTracks, def: &TrackDefinition| {
        expanded.line_names.push(def.line_names.clone());
        expanded.sizes.push(def.size);
    };

    for position in 0..=template.tracks.len() {
        for (_, repeat) in template.repeats.iter().filter(|(at, _)| *at == position) {
            let times = match repeat {
                TrackRepeat::Count(count, _) => (*count).max(0) as usize,
                TrackRepeat::AutoFill(tracks) | TrackRepeat::AutoFit(tracks) if !seen_auto => {
                    seen_auto = true;
                    auto_repeat_count(template, tracks, space, gap)
                }
                _ => 1,
            };
            let start = expanded.len();
            for _ in 0..times {
                for def in repeat.tracks() {
                    push(&mut expanded, def);
                }
            }
            if matches!(repeat, TrackRepeat::AutoFit(_)) && expanded.auto_fit.is_none() {
                expanded.auto_fit = Some(start..expanded.len());
            }
            trace!(times, tracks = repeat.tracks().len(), "expanded repeat");
        }
        if let Some(def) = template.tracks.get(position) {
            push(&mut expanded, def);
        }
    }
    expanded.line_names.push(template.final_line_names.clone());
    expanded
}

// ==================== Track list ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackKind {
    Track,
    Gutter,
}

/// One track or gutter during sizing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridTrack {
    pub kind: TrackKind,
    pub min: SizingFunction,
    pub max: SizingFunction,
    /// Start offset in the container's content box.
    pub offset: f32,
    pub base_size: f32,
    pub growth_limit: f32,
    /// Scratch: increase this item wants before the group is flushed.
    pub item_incurred_increase: f32,
    /// Scratch: accumulated base size increase for the current group.
    pub base_size_planned_increase: f32,
    /// Scratch: accumulated growth limit increase for the current group.
    pub growth_limit_planned_increase: f32,
    pub infinitely_growable: bool,
    /// Empty `auto-fit` track, or a gutter next to one.
    pub is_collapsed: bool,
}

impl GridTrack {
    pub fn new(sizing: TrackSizingFunction) -> Self {
        Self {
            kind: TrackKind::Track,
            min: sizing.min,
            max: sizing.max,
            offset: 0.0,
            base_size: 0.0,
            growth_limit: 0.0,
            item_incurred_increase: 0.0,
            base_size_planned_increase: 0.0,
            growth_limit_planned_increase: 0.0,
            infinitely_growable: false,
            is_collapsed: false,
        }
    }

    pub fn gutter(size: f32) -> Self {
        Self {
            kind: TrackKind::Gutter,
            ..Self::new(SizingFunction::Length(size).into())
        }
    }

    pub fn collapsed(kind: TrackKind) -> Self {
        Self {
            kind,
            is_collapsed: true,
            ..Self::new(SizingFunction::Length(0.0).into())
        }
    }

    pub fn is_track(&self) -> bool {
        self.kind == TrackKind::Track
    }

    pub fn is_flexible(&self) -> bool {
        !self.is_collapsed && self.max.is_flexible()
    }

    pub fn flex_factor(&self) -> f32 {
        if self.is_flexible() {
            self.max.flex_factor()
        } else {
            0.0
        }
    }

    pub fn fit_content_limit(&self) -> Option<f32> {
        match self.max {
            SizingFunction::FitContent(limit) => Some(limit),
            _ => None,
        }
    }

    /// Growth limit with an infinite limit replaced by the base size.
    pub fn finite_growth_limit(&self) -> f32 {
        if self.growth_limit.is_finite() {
            self.growth_limit
        } else {
            self.base_size
        }
    }
}

/// Sizing of the implicit track at `index`.
///
/// Tracks after the template cycle forward through `auto_tracks`; tracks
/// before the explicit grid cycle backward from its last entry.
fn implicit_sizing(auto_tracks: &[TrackSizingFunction], index: isize) -> TrackSizingFunction {
    if auto_tracks.is_empty() {
        return TrackSizingFunction::default();
    }
    let len = auto_tracks.len() as isize;
    auto_tracks[index.rem_euclid(len) as usize]
}

/// Build the track list for one axis.
///
/// `occupied` reports whether any item covers the track starting at a line;
/// empty `auto-fit` tracks collapse.
pub(crate) fn build_tracks(
    counts: TrackCounts,
    explicit: &ExplicitTracks,
    auto_tracks: &[TrackSizingFunction],
    gap: f32,
    occupied: impl Fn(OriginZeroLine) -> bool,
) -> Vec<GridTrack> {
    let negative = usize::from(counts.negative_implicit);
    let mut content = Vec::with_capacity(counts.len());

    for index in 0..counts.len() {
        let line = counts.line_at(index);
        let track = if index < negative {
            // the track just before line 0 takes the last auto size
            GridTrack::new(implicit_sizing(auto_tracks, index as isize - negative as isize))
        } else {
            let explicit_index = index - negative;
            match explicit.sizes.get(explicit_index) {
                Some(size) => {
                    let auto_fit = explicit
                        .auto_fit
                        .as_ref()
                        .is_some_and(|range| range.contains(&explicit_index));
                    if auto_fit && !occupied(line) {
                        GridTrack::collapsed(TrackKind::Track)
                    } else {
                        GridTrack::new(*size)
                    }
                }
                None => GridTrack::new(implicit_sizing(
                    auto_tracks,
                    (explicit_index - explicit.sizes.len()) as isize,
                )),
            }
        };
        content.push(track);
    }

    let mut tracks = Vec::with_capacity(content.len() * 2 + 1);
    tracks.push(GridTrack::gutter(0.0));
    for index in 0..content.len() {
        let visible = !content[index].is_collapsed;
        let visible_after = content[index + 1..].iter().any(|track| !track.is_collapsed);
        tracks.push(content[index].clone());
        if index + 1 == content.len() {
            tracks.push(GridTrack::gutter(0.0));
        } else if visible && visible_after {
            tracks.push(GridTrack::gutter(gap));
        } else {
            tracks.push(GridTrack::collapsed(TrackKind::Gutter));
        }
    }
    tracks
}
