//! Resolving flexible lengths by iterative freezing.
//!
//! Free space is shared among unfrozen items in proportion to their active
//! factor. Items that end up outside their min/max are clamped and frozen,
//! and the rest of the free space is shared again. The loop stops at the
//! first pass that freezes everything or at the configured bound.

use tracing::{debug, trace};

/// Per-item state of one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Unresolved,
    Frozen(f32),
}

impl Resolution {
    pub fn is_frozen(self) -> bool {
        matches!(self, Resolution::Frozen(_))
    }
}

/// One participant in a flexible-length resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexibleItem {
    pub basis: f32,
    /// Basis clamped by min/max.
    pub hypothetical: f32,
    pub grow: f32,
    pub shrink: f32,
    pub min: f32,
    /// `f32::INFINITY` when unbounded.
    pub max: f32,
    /// Fixed space outside the item (margins).
    pub outer: f32,
}

impl FlexibleItem {
    fn clamp(&self, size: f32) -> f32 {
        size.min(self.max).max(self.min)
    }
}

/// Outcome of [`resolve_flexible_lengths`].
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeReport {
    pub sizes: Vec<f32>,
    /// Space left after every item took its size. Negative on overflow.
    pub remaining_free_space: f32,
    pub iterations: usize,
    /// False when the iteration bound cut the loop short.
    pub converged: bool,
}

/// Resolve `items` into `available` space.
pub fn resolve_flexible_lengths(
    items: &[FlexibleItem],
    available: f32,
    max_iterations: usize,
    epsilon: f32,
) -> FreezeReport {
    let outer: f32 = items.iter().map(|item| item.outer).sum();
    let hypothetical: f32 = items.iter().map(|item| item.hypothetical).sum();
    let growing = available - outer - hypothetical > 0.0;

    let factor = |item: &FlexibleItem| if growing { item.grow } else { item.shrink };

    let mut state: Vec<Resolution> = items
        .iter()
        .map(|item| {
            let inflexible = factor(item) <= 0.0
                || (growing && item.basis > item.hypothetical)
                || (!growing && item.basis < item.hypothetical);
            if inflexible {
                Resolution::Frozen(item.hypothetical)
            } else {
                Resolution::Unresolved
            }
        })
        .collect();
    let mut targets: Vec<f32> = items.iter().map(|item| item.hypothetical).collect();

    let free_space = |state: &[Resolution]| {
        let used: f32 = items
            .iter()
            .zip(state)
            .map(|(item, resolution)| match resolution {
                Resolution::Frozen(size) => *size,
                Resolution::Unresolved => item.basis,
            })
            .sum();
        available - outer - used
    };
    let initial_free_space = free_space(&state);

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations.max(1) {
        if state.iter().all(|resolution| resolution.is_frozen()) {
            converged = true;
            break;
        }
        iterations += 1;

        let mut remaining = free_space(&state);
        let unfrozen = || {
            items
                .iter()
                .zip(&state)
                .enumerate()
                .filter(|(_, (_, resolution))| !resolution.is_frozen())
                .map(|(index, (item, _))| (index, item))
        };

        let factor_sum: f32 = unfrozen().map(|(_, item)| factor(item)).sum();
        if factor_sum < 1.0 {
            let scaled = initial_free_space * factor_sum;
            if scaled.abs() < remaining.abs() {
                remaining = scaled;
            }
        }

        if growing {
            for (index, item) in unfrozen() {
                let share = if factor_sum > 0.0 { item.grow / factor_sum } else { 0.0 };
                targets[index] = item.basis + remaining * share;
            }
        } else {
            let scaled_sum: f32 = unfrozen().map(|(_, item)| item.shrink * item.basis).sum();
            for (index, item) in unfrozen() {
                let share = if scaled_sum > 0.0 {
                    item.shrink * item.basis / scaled_sum
                } else {
                    0.0
                };
                targets[index] = item.basis - remaining.abs() * share;
            }
        }

        let mut total_violation = 0.0;
        let mut violations = vec![0.0; items.len()];
        for (index, item) in unfrozen() {
            let clamped = item.clamp(targets[index]);
            violations[index] = clamped - targets[index];
            total_violation += violations[index];
        }

        trace!(iteration = iterations, remaining, total_violation, "flexible length pass");

        for index in 0..items.len() {
            if state[index].is_frozen() {
                continue;
            }
            let violation = violations[index];
            let freeze = if total_violation.abs() <= epsilon {
                true
            } else if total_violation > 0.0 {
                violation > 0.0
            } else {
                violation < 0.0
            };
            if freeze {
                state[index] = Resolution::Frozen(items[index].clamp(targets[index]));
            }
        }
    }

    if !converged && state.iter().all(|resolution| resolution.is_frozen()) {
        converged = true;
    }
    if !converged {
        debug!(iterations, "flexible length resolution hit its iteration bound");
    }

    let sizes: Vec<f32> = items
        .iter()
        .zip(&state)
        .zip(&targets)
        .map(|((item, resolution), target)| match resolution {
            Resolution::Frozen(size) => *size,
            Resolution::Unresolved => item.clamp(*target),
        })
        .collect();
    let remaining_free_space = available - outer - sizes.iter().sum::<f32>();

    FreezeReport {
        sizes,
        remaining_free_space,
        iterations,
        converged,
    }
}
