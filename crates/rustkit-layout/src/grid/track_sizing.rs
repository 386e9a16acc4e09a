//! Grid track sizing.
//!
//! Implements <https://www.w3.org/TR/css-grid-1/#algo-track-sizing> for one
//! axis at a time. Item contributions are measured by the caller; this
//! module only moves numbers between tracks. Increases are planned in each
//! track's scratch fields and flushed once per step, so no step reads a
//! base size it has already changed.

use std::ops::Range;

use rustkit_style::SizingFunction;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::tracks::GridTrack;
use crate::config::LayoutConfig;
use crate::freeze::Resolution;
use crate::geometry::{AvailableSpace, Axis};
use crate::resolve::fit_content;

type TrackIndices = SmallVec<[usize; 8]>;

/// An item's contributions along the axis being sized.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackItem {
    /// Track-list slots covered, including the gutters between its tracks.
    pub slots: Range<usize>,
    pub min_content: f32,
    pub max_content: f32,
    /// Outer size with the item's minimum size as its preferred size.
    pub minimum: f32,
}

impl TrackItem {
    fn span(&self) -> usize {
        (self.slots.len() + 1) / 2
    }

    fn crosses_flexible(&self, tracks: &[GridTrack]) -> bool {
        self.slots.clone().any(|slot| tracks[slot].is_flexible())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeTarget {
    BaseSize,
    GrowthLimit,
}

fn has_intrinsic_min(track: &GridTrack) -> bool {
    matches!(
        track.min,
        SizingFunction::Auto | SizingFunction::MinContent | SizingFunction::MaxContent
    )
}

fn has_intrinsic_max(track: &GridTrack) -> bool {
    track.max.is_intrinsic()
}

fn is_sizable(track: &GridTrack) -> bool {
    track.is_track() && !track.is_collapsed
}

/// Size `tracks` (gutters included) for `items` in `available` space.
///
/// `stretch_auto` grows `auto` tracks into leftover definite space.
pub(crate) fn size_tracks(
    axis: Axis,
    tracks: &mut [GridTrack],
    items: &[TrackItem],
    available: AvailableSpace,
    stretch_auto: bool,
    config: &LayoutConfig,
) {
    initialize_tracks(tracks, available.definite());

    let under_constraint = !available.is_definite();
    size_single_span_items(tracks, items, under_constraint);
    size_spanning_items(tracks, items, available, config.epsilon);
    size_flexible_crossing_items(tracks, items, under_constraint, config.epsilon);

    for track in tracks.iter_mut() {
        if track.growth_limit.is_infinite() {
            track.growth_limit = track.base_size;
        }
    }

    maximize_tracks(tracks, available, config.epsilon);
    expand_flexible_tracks(tracks, items, available, config);
    if stretch_auto {
        stretch_auto_tracks(tracks, available, config.epsilon);
    }

    let total: f32 = tracks.iter().map(|track| track.base_size).sum();
    debug!(?axis, tracks = tracks.len() / 2, items = items.len(), total, "sized grid tracks");
    trace!(
        ?axis,
        sizes = ?tracks.iter().filter(|t| t.is_track()).map(|t| t.base_size).collect::<Vec<_>>(),
        "track base sizes"
    );
}

// ==================== Initialize ====================

fn initialize_tracks(tracks: &mut [GridTrack], basis: Option<f32>) {
    for track in tracks.iter_mut() {
        // percentages against an indefinite size behave as auto
        if basis.is_none() {
            if let SizingFunction::Percent(_) = track.min {
                track.min = SizingFunction::Auto;
            }
            if let SizingFunction::Percent(_) = track.max {
                track.max = SizingFunction::Auto;
            }
        }

        track.base_size = match track.min {
            SizingFunction::Length(_) | SizingFunction::Percent(_) => track.min.resolve(basis).unwrap_or(0.0),
            _ => 0.0,
        };
        track.growth_limit = match track.max {
            SizingFunction::Length(_) | SizingFunction::Percent(_) => {
                track.max.resolve(basis).unwrap_or(f32::INFINITY)
            }
            _ => f32::INFINITY,
        };
        if track.is_collapsed {
            track.base_size = 0.0;
            track.growth_limit = 0.0;
        }
        track.growth_limit = track.growth_limit.max(track.base_size);
        track.item_incurred_increase = 0.0;
        track.base_size_planned_increase = 0.0;
        track.growth_limit_planned_increase = 0.0;
        track.infinitely_growable = false;
    }
}

// ==================== Intrinsic sizes ====================

fn size_single_span_items(tracks: &mut [GridTrack], items: &[TrackItem], under_constraint: bool) {
    let mut max_contributions: Vec<Option<f32>> = vec![None; tracks.len()];

    for item in items.iter().filter(|item| item.slots.len() == 1) {
        let slot = item.slots.start;
        let track = &mut tracks[slot];
        if !is_sizable(track) {
            continue;
        }

        let min_contribution = match track.min {
            SizingFunction::MinContent => Some(item.min_content),
            SizingFunction::MaxContent => Some(item.max_content),
            SizingFunction::Auto if under_constraint => Some(item.min_content),
            SizingFunction::Auto => Some(item.minimum),
            _ => None,
        };
        if let Some(contribution) = min_contribution {
            let increase = contribution - track.base_size;
            track.base_size_planned_increase = track.base_size_planned_increase.max(increase);
        }

        let max_contribution = match track.max {
            SizingFunction::MinContent => Some(item.min_content),
            SizingFunction::MaxContent | SizingFunction::Auto | SizingFunction::FitContent(_) => {
                Some(item.max_content)
            }
            _ => None,
        };
        if let Some(contribution) = max_contribution {
            let entry = max_contributions[slot].get_or_insert(0.0);
            *entry = entry.max(contribution);
        }
    }

    flush_planned(tracks, SizeTarget::BaseSize);
    for (track, contribution) in tracks.iter_mut().zip(max_contributions) {
        if let Some(contribution) = contribution {
            track.growth_limit = match track.fit_content_limit() {
                Some(limit) => fit_content(track.base_size, contribution, limit),
                None => contribution,
            };
        }
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}

/// Items spanning several tracks, none of them flexible, in groups of
/// ascending span.
fn size_spanning_items(tracks: &mut [GridTrack], items: &[TrackItem], available: AvailableSpace, epsilon: f32) {
    let mut spanning: Vec<&TrackItem> = items
        .iter()
        .filter(|item| item.span() > 1 && !item.crosses_flexible(tracks))
        .collect();
    spanning.sort_by_key(|item| item.span());

    let under_constraint = !available.is_definite();
    let max_content_sizing = available == AvailableSpace::MaxContent;

    let mut start = 0;
    while start < spanning.len() {
        let span = spanning[start].span();
        let end = spanning[start..]
            .iter()
            .position(|item| item.span() != span)
            .map_or(spanning.len(), |offset| start + offset);
        let group = &spanning[start..end];
        start = end;

        // intrinsic minimums
        for item in group {
            let space = if under_constraint { item.min_content } else { item.minimum };
            distribute_space(tracks, item, space, SizeTarget::BaseSize, has_intrinsic_min, has_intrinsic_max, epsilon);
        }
        flush_planned(tracks, SizeTarget::BaseSize);

        // content-based minimums
        let content_min = |t: &GridTrack| matches!(t.min, SizingFunction::MinContent | SizingFunction::MaxContent);
        for item in group {
            distribute_space(tracks, item, item.min_content, SizeTarget::BaseSize, content_min, has_intrinsic_max, epsilon);
        }
        flush_planned(tracks, SizeTarget::BaseSize);

        // max-content minimums
        let max_content_min = |t: &GridTrack| {
            matches!(t.min, SizingFunction::MaxContent) || (max_content_sizing && t.min.is_auto())
        };
        let max_content_max = |t: &GridTrack| matches!(t.max, SizingFunction::MaxContent | SizingFunction::Auto);
        for item in group {
            distribute_space(tracks, item, item.max_content, SizeTarget::BaseSize, max_content_min, max_content_max, epsilon);
        }
        flush_planned(tracks, SizeTarget::BaseSize);

        // intrinsic maximums
        let not_fit_content = |t: &GridTrack| t.fit_content_limit().is_none();
        for item in group {
            distribute_space(tracks, item, item.min_content, SizeTarget::GrowthLimit, has_intrinsic_max, not_fit_content, epsilon);
        }
        flush_planned(tracks, SizeTarget::GrowthLimit);

        // max-content maximums
        let max_content_limit = |t: &GridTrack| {
            matches!(
                t.max,
                SizingFunction::MaxContent | SizingFunction::Auto | SizingFunction::FitContent(_)
            )
        };
        for item in group {
            distribute_space(tracks, item, item.max_content, SizeTarget::GrowthLimit, max_content_limit, not_fit_content, epsilon);
        }
        flush_planned(tracks, SizeTarget::GrowthLimit);
        for track in tracks.iter_mut() {
            track.infinitely_growable = false;
        }
    }
}

/// Spanning items that cross a flexible track only grow flexible tracks.
fn size_flexible_crossing_items(tracks: &mut [GridTrack], items: &[TrackItem], under_constraint: bool, epsilon: f32) {
    let mut crossing: Vec<&TrackItem> = items
        .iter()
        .filter(|item| item.span() > 1 && item.crosses_flexible(tracks))
        .collect();
    crossing.sort_by_key(|item| item.span());

    let flexible = |t: &GridTrack| t.is_flexible() && has_intrinsic_min(t);
    let mut previous_span = crossing.first().map_or(0, |item| item.span());
    for item in crossing {
        if item.span() != previous_span {
            flush_planned(tracks, SizeTarget::BaseSize);
            previous_span = item.span();
        }
        let space = if under_constraint { item.min_content } else { item.minimum };
        distribute_space(tracks, item, space, SizeTarget::BaseSize, flexible, flexible, epsilon);
    }
    flush_planned(tracks, SizeTarget::BaseSize);
}

/// Plan the increases needed for `item` to fit `space` across its tracks.
///
/// Extra space goes equally to `affected` tracks until they reach their
/// limit, then to the `beyond` subset (all affected tracks for base sizes
/// when that subset is empty).
fn distribute_space(
    tracks: &mut [GridTrack],
    item: &TrackItem,
    space: f32,
    target: SizeTarget,
    affected: impl Fn(&GridTrack) -> bool,
    beyond: impl Fn(&GridTrack) -> bool,
    epsilon: f32,
) {
    let affected: TrackIndices = item
        .slots
        .clone()
        .filter(|&slot| is_sizable(&tracks[slot]) && affected(&tracks[slot]))
        .collect();
    if affected.is_empty() {
        return;
    }

    let current = |track: &GridTrack| match target {
        SizeTarget::BaseSize => track.base_size,
        SizeTarget::GrowthLimit => track.finite_growth_limit(),
    };
    let used: f32 = item.slots.clone().map(|slot| current(&tracks[slot])).sum();
    let extra = space - used;
    if extra <= epsilon {
        return;
    }

    for &slot in &affected {
        tracks[slot].item_incurred_increase = 0.0;
    }

    let headroom = |track: &GridTrack| match target {
        SizeTarget::BaseSize => track.growth_limit - track.base_size,
        SizeTarget::GrowthLimit if track.infinitely_growable => f32::INFINITY,
        SizeTarget::GrowthLimit => match track.fit_content_limit() {
            Some(limit) => (limit.max(track.base_size) - current(track)).max(0.0),
            None if track.growth_limit.is_infinite() => f32::INFINITY,
            None => 0.0,
        },
    };
    let remaining = share_equally(tracks, &affected, extra, headroom, epsilon);

    if remaining > epsilon {
        let mut overflow: TrackIndices = affected.iter().copied().filter(|&slot| beyond(&tracks[slot])).collect();
        if overflow.is_empty() && target == SizeTarget::BaseSize {
            overflow = affected.clone();
        }
        share_equally(tracks, &overflow, remaining, |_| f32::INFINITY, epsilon);
    }

    for &slot in &affected {
        let track = &mut tracks[slot];
        match target {
            SizeTarget::BaseSize => {
                track.base_size_planned_increase = track.base_size_planned_increase.max(track.item_incurred_increase);
            }
            SizeTarget::GrowthLimit => {
                track.growth_limit_planned_increase =
                    track.growth_limit_planned_increase.max(track.item_incurred_increase);
            }
        }
    }
}

/// Share `extra` equally among `slots`, each capped at `headroom`. Returns
/// what could not be placed.
fn share_equally(
    tracks: &mut [GridTrack],
    slots: &[usize],
    mut extra: f32,
    headroom: impl Fn(&GridTrack) -> f32,
    epsilon: f32,
) -> f32 {
    // each pass either places everything or caps at least one track
    for _ in 0..=slots.len() {
        let open: TrackIndices = slots
            .iter()
            .copied()
            .filter(|&slot| tracks[slot].item_incurred_increase < headroom(&tracks[slot]) - epsilon)
            .collect();
        if open.is_empty() || extra <= epsilon {
            break;
        }

        let share = extra / open.len() as f32;
        for slot in open {
            let track = &mut tracks[slot];
            let room = headroom(track) - track.item_incurred_increase;
            let increase = share.min(room);
            track.item_incurred_increase += increase;
            extra -= increase;
        }
    }
    extra.max(0.0)
}

fn flush_planned(tracks: &mut [GridTrack], target: SizeTarget) {
    for track in tracks.iter_mut() {
        match target {
            SizeTarget::BaseSize => {
                track.base_size += track.base_size_planned_increase;
                track.base_size_planned_increase = 0.0;
            }
            SizeTarget::GrowthLimit => {
                let increase = track.growth_limit_planned_increase;
                if increase > 0.0 {
                    if track.growth_limit.is_infinite() {
                        track.growth_limit = track.base_size + increase;
                        track.infinitely_growable = true;
                    } else {
                        track.growth_limit += increase;
                    }
                }
                track.growth_limit_planned_increase = 0.0;
            }
        }
        track.item_incurred_increase = 0.0;
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}

// ==================== Free space ====================

fn free_space(tracks: &[GridTrack], size: f32) -> f32 {
    size - tracks.iter().map(|track| track.base_size).sum::<f32>()
}

/// Grow non-flexible tracks toward their growth limits.
fn maximize_tracks(tracks: &mut [GridTrack], available: AvailableSpace, epsilon: f32) {
    let growable: TrackIndices = (0..tracks.len())
        .filter(|&slot| is_sizable(&tracks[slot]) && !tracks[slot].is_flexible())
        .collect();

    match available {
        AvailableSpace::Definite(size) => {
            let free = free_space(tracks, size);
            if free <= epsilon {
                return;
            }
            share_equally(tracks, &growable, free, |t| t.growth_limit - t.base_size, epsilon);
            for &slot in &growable {
                let track = &mut tracks[slot];
                track.base_size += track.item_incurred_increase;
                track.item_incurred_increase = 0.0;
            }
        }
        AvailableSpace::MaxContent => {
            for &slot in &growable {
                tracks[slot].base_size = tracks[slot].growth_limit;
            }
        }
        AvailableSpace::MinContent => {}
    }
}

/// Largest `fr` size such that the flexible tracks in `slots` fit `space`.
///
/// Tracks whose base size already exceeds their share are frozen as
/// inflexible and the share is recomputed.
fn find_fr_size(tracks: &[GridTrack], slots: Range<usize>, space: f32, config: &LayoutConfig) -> f32 {
    let mut state: SmallVec<[(usize, Resolution); 8]> = slots
        .map(|slot| {
            let track = &tracks[slot];
            let resolution = if track.is_flexible() {
                Resolution::Unresolved
            } else {
                Resolution::Frozen(track.base_size)
            };
            (slot, resolution)
        })
        .collect();

    let mut fraction = 0.0;
    for iteration in 0..config.max_track_iterations.max(1) {
        let frozen: f32 = state
            .iter()
            .filter_map(|(_, resolution)| match resolution {
                Resolution::Frozen(size) => Some(*size),
                Resolution::Unresolved => None,
            })
            .sum();
        let factors: f32 = state
            .iter()
            .filter(|(_, resolution)| !resolution.is_frozen())
            .map(|&(slot, _)| tracks[slot].flex_factor())
            .sum();
        fraction = ((space - frozen) / factors.max(1.0)).max(0.0);

        let mut changed = false;
        for (slot, resolution) in state.iter_mut() {
            let track = &tracks[*slot];
            if !resolution.is_frozen() && track.base_size > fraction * track.flex_factor() + config.epsilon {
                *resolution = Resolution::Frozen(track.base_size);
                changed = true;
            }
        }
        if !changed {
            return fraction;
        }
        if iteration + 1 == config.max_track_iterations.max(1) {
            debug!(iterations = iteration + 1, fraction, "fr size search hit its iteration bound");
        }
    }
    fraction
}

fn expand_flexible_tracks(
    tracks: &mut [GridTrack],
    items: &[TrackItem],
    available: AvailableSpace,
    config: &LayoutConfig,
) {
    let flexible: TrackIndices = (0..tracks.len()).filter(|&slot| tracks[slot].is_flexible()).collect();
    if flexible.is_empty() {
        return;
    }

    let fraction = match available {
        AvailableSpace::Definite(size) => find_fr_size(tracks, 0..tracks.len(), size, config),
        indefinite => {
            let mut fraction = flexible
                .iter()
                .map(|&slot| tracks[slot].base_size / tracks[slot].flex_factor().max(1.0))
                .fold(0.0, f32::max);
            for item in items.iter().filter(|item| item.crosses_flexible(tracks)) {
                let space = match indefinite {
                    AvailableSpace::MinContent => item.min_content,
                    _ => item.max_content,
                };
                fraction = fraction.max(find_fr_size(tracks, item.slots.clone(), space, config));
            }
            fraction
        }
    };

    trace!(fraction, tracks = flexible.len(), "expanded flexible tracks");
    for slot in flexible {
        let track = &mut tracks[slot];
        track.base_size = track.base_size.max(fraction * track.flex_factor());
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}

/// Share leftover definite space equally among `auto` tracks.
fn stretch_auto_tracks(tracks: &mut [GridTrack], available: AvailableSpace, epsilon: f32) {
    let AvailableSpace::Definite(size) = available else {
        return;
    };
    let free = free_space(tracks, size);
    let auto: TrackIndices = (0..tracks.len())
        .filter(|&slot| is_sizable(&tracks[slot]) && tracks[slot].max.is_auto())
        .collect();
    if free <= epsilon || auto.is_empty() {
        return;
    }

    let share = free / auto.len() as f32;
    for slot in auto {
        let track = &mut tracks[slot];
        track.base_size += share;
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}
