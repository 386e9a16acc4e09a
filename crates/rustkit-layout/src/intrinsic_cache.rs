//! Intrinsic sizing cache.
//!
//! Min-content and max-content sizes are expensive: each one lays out the
//! item's whole subtree, and flex and grid ask for the same item several
//! times per pass. Results are memoized here for the duration of one
//! top-level layout call.
//!
//! The cache is owned by the layout context, so it starts empty on every
//! call and nothing leaks between calls. Keys are `(node, axis, mode)`;
//! sizes that depend on a caller-supplied width are never stored.

use std::collections::HashMap;

use crate::geometry::Axis;
use crate::tree::NodeId;

/// Intrinsic sizing mode for cache lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicSizingMode {
    /// Minimum content size - the smallest size that doesn't cause overflow.
    /// For text, this is typically the width of the longest word.
    MinContent,
    /// Maximum content size - the size needed to fit all content without wrapping.
    /// For text, this is the width needed to display on a single line.
    MaxContent,
}

type CacheKey = (NodeId, Axis, IntrinsicSizingMode);

/// Cache statistics for debugging and profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: usize,
    pub hits: usize,
    pub stores: usize,
}

/// Per-call memo of intrinsic sizes.
#[derive(Debug, Default)]
pub struct IntrinsicCache {
    entries: HashMap<CacheKey, f32>,
    stats: CacheStats,
}

impl IntrinsicCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached size.
    pub fn lookup(&mut self, node: NodeId, axis: Axis, mode: IntrinsicSizingMode) -> Option<f32> {
        self.stats.lookups += 1;
        let value = self.entries.get(&(node, axis, mode)).copied();
        if value.is_some() {
            self.stats.hits += 1;
        }
        value
    }

    /// Store a computed size. Non-finite values are dropped.
    pub fn store(&mut self, node: NodeId, axis: Axis, mode: IntrinsicSizingMode, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.entries.insert((node, axis, mode), value);
        self.stats.stores += 1;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BoxTree;
    use rustkit_style::BoxStyle;

    fn nodes(count: usize) -> Vec<NodeId> {
        let mut tree = BoxTree::new();
        (0..count).map(|_| tree.container(BoxStyle::new())).collect()
    }

    #[test]
    fn test_cache_miss_on_first_lookup() {
        let ids = nodes(1);
        let mut cache = IntrinsicCache::new();
        assert!(cache
            .lookup(ids[0], Axis::Horizontal, IntrinsicSizingMode::MinContent)
            .is_none());
    }

    #[test]
    fn test_cache_hit_after_store() {
        let ids = nodes(1);
        let mut cache = IntrinsicCache::new();
        cache.store(ids[0], Axis::Horizontal, IntrinsicSizingMode::MinContent, 100.0);
        assert_eq!(
            cache.lookup(ids[0], Axis::Horizontal, IntrinsicSizingMode::MinContent),
            Some(100.0)
        );
    }

    #[test]
    fn test_cache_keys_separate_mode_and_axis() {
        let ids = nodes(1);
        let mut cache = IntrinsicCache::new();
        cache.store(ids[0], Axis::Horizontal, IntrinsicSizingMode::MinContent, 100.0);

        assert!(cache
            .lookup(ids[0], Axis::Horizontal, IntrinsicSizingMode::MaxContent)
            .is_none());
        assert!(cache
            .lookup(ids[0], Axis::Vertical, IntrinsicSizingMode::MinContent)
            .is_none());
    }

    #[test]
    fn test_non_finite_values_not_cached() {
        let ids = nodes(2);
        let mut cache = IntrinsicCache::new();
        cache.store(ids[0], Axis::Horizontal, IntrinsicSizingMode::MinContent, f32::NAN);
        cache.store(ids[1], Axis::Horizontal, IntrinsicSizingMode::MinContent, f32::INFINITY);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().stores, 0);
    }

    #[test]
    fn test_stats_tracking() {
        let ids = nodes(1);
        let mut cache = IntrinsicCache::new();

        // Miss
        cache.lookup(ids[0], Axis::Vertical, IntrinsicSizingMode::MaxContent);
        // Store
        cache.store(ids[0], Axis::Vertical, IntrinsicSizingMode::MaxContent, 40.0);
        // Hit
        cache.lookup(ids[0], Axis::Vertical, IntrinsicSizingMode::MaxContent);

        assert_eq!(
            cache.stats(),
            CacheStats {
                lookups: 2,
                hits: 1,
                stores: 1
            }
        );

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.len(), 0);
    }
}
