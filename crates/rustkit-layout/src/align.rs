//! Free-space distribution.
//!
//! One routine positions flex items on the main axis, flex lines on the
//! cross axis, grid tracks on both axes and single items inside their
//! line or grid area.

use rustkit_style::{AlignContent, AlignItems, JustifyContent, JustifyItems};

/// How free space is shared out among slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionMode {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    /// Callers grow the slots themselves; positions are computed as `Start`.
    Stretch,
}

impl DistributionMode {
    /// Swap start and end. Used where offsets are computed forward and then
    /// mirrored, so that physical `start`/`end` survive the mirror.
    fn flipped(self, flip: bool) -> Self {
        match (self, flip) {
            (DistributionMode::Start, true) => DistributionMode::End,
            (DistributionMode::End, true) => DistributionMode::Start,
            (mode, _) => mode,
        }
    }

    /// `justify-content`. `reversed` is set for `*-reverse` flex directions.
    pub fn from_justify_content(value: JustifyContent, reversed: bool) -> Self {
        match value {
            JustifyContent::FlexStart => DistributionMode::Start,
            JustifyContent::FlexEnd => DistributionMode::End,
            JustifyContent::Start => DistributionMode::Start.flipped(reversed),
            JustifyContent::End => DistributionMode::End.flipped(reversed),
            JustifyContent::Center => DistributionMode::Center,
            JustifyContent::SpaceBetween => DistributionMode::SpaceBetween,
            JustifyContent::SpaceAround => DistributionMode::SpaceAround,
            JustifyContent::SpaceEvenly => DistributionMode::SpaceEvenly,
            JustifyContent::Stretch => DistributionMode::Stretch,
        }
    }

    /// `align-content`. `reversed` is set for `wrap-reverse`.
    pub fn from_align_content(value: AlignContent, reversed: bool) -> Self {
        match value {
            AlignContent::FlexStart => DistributionMode::Start,
            AlignContent::FlexEnd => DistributionMode::End,
            AlignContent::Start => DistributionMode::Start.flipped(reversed),
            AlignContent::End => DistributionMode::End.flipped(reversed),
            AlignContent::Center => DistributionMode::Center,
            AlignContent::SpaceBetween => DistributionMode::SpaceBetween,
            AlignContent::SpaceAround => DistributionMode::SpaceAround,
            AlignContent::SpaceEvenly => DistributionMode::SpaceEvenly,
            AlignContent::Stretch => DistributionMode::Stretch,
        }
    }

    /// Self alignment from `align-items`/`align-self`. Baseline falls back to
    /// start.
    pub fn from_align_items(value: AlignItems, reversed: bool) -> Self {
        match value {
            AlignItems::FlexStart | AlignItems::Baseline => DistributionMode::Start,
            AlignItems::FlexEnd => DistributionMode::End,
            AlignItems::Start => DistributionMode::Start.flipped(reversed),
            AlignItems::End => DistributionMode::End.flipped(reversed),
            AlignItems::Center => DistributionMode::Center,
            AlignItems::Stretch => DistributionMode::Stretch,
        }
    }

    pub fn from_justify_items(value: JustifyItems) -> Self {
        match value {
            JustifyItems::Start => DistributionMode::Start,
            JustifyItems::End => DistributionMode::End,
            JustifyItems::Center => DistributionMode::Center,
            JustifyItems::Stretch => DistributionMode::Stretch,
        }
    }

    fn is_spacing(self) -> bool {
        matches!(
            self,
            DistributionMode::SpaceBetween | DistributionMode::SpaceAround | DistributionMode::SpaceEvenly
        )
    }
}

/// Offsets of each slot given their extents, the leftover free space and a
/// fixed gap between neighbours.
///
/// Spacing modes fall back to `Start` when there is no free space to share
/// or fewer than two slots. `End` and `Center` go negative on overflow.
pub fn distribute(extents: &[f32], free_space: f32, mode: DistributionMode, gap: f32) -> Vec<f32> {
    let count = extents.len();
    if count == 0 {
        return Vec::new();
    }

    let free_space = if free_space.is_finite() { free_space } else { 0.0 };
    let mode = if mode.is_spacing() && (free_space < 0.0 || count < 2) {
        DistributionMode::Start
    } else {
        mode
    };

    let n = count as f32;
    let (leading, between) = match mode {
        DistributionMode::Start | DistributionMode::Stretch => (0.0, 0.0),
        DistributionMode::End => (free_space, 0.0),
        DistributionMode::Center => (free_space / 2.0, 0.0),
        DistributionMode::SpaceBetween => (0.0, free_space / (n - 1.0)),
        DistributionMode::SpaceAround => (free_space / n / 2.0, free_space / n),
        DistributionMode::SpaceEvenly => (free_space / (n + 1.0), free_space / (n + 1.0)),
    };

    let mut offsets = Vec::with_capacity(count);
    let mut cursor = leading;
    for extent in extents {
        offsets.push(cursor);
        cursor += extent + gap + between;
    }
    offsets
}

/// Offset of a single box inside a slot of `free_space` spare room.
pub fn align_single(free_space: f32, mode: DistributionMode) -> f32 {
    distribute(&[0.0], free_space, mode, 0.0)[0]
}
