//! Per-call layout state.
//!
//! A [`LayoutContext`] is created by [`layout_tree`](crate::layout_tree) and
//! threaded through every algorithm. It owns everything that lives for one
//! call: the intrinsic cache, the trace and the geometry buffer.

use rustkit_text::TextMeasurer;
use tracing::trace;

use crate::compute::RunMode;
use crate::config::LayoutConfig;
use crate::geometry::{Axis, GeometryResult, Size};
use crate::intrinsic_cache::IntrinsicCache;
use crate::tree::{BoxTree, NodeId};

/// What happened at a trace point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceEventKind {
    Enter { run_mode: RunMode },
    Leave { size: Size<f32> },
}

/// One recorded enter or leave of a node's layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceEvent {
    pub node: NodeId,
    pub depth: usize,
    pub kind: TraceEventKind,
}

/// Nesting tracker for layout calls.
///
/// Always emits `tracing` events; keeps them only when recording is on.
#[derive(Debug, Default)]
pub struct LayoutTrace {
    depth: usize,
    record: bool,
    events: Vec<TraceEvent>,
}

impl LayoutTrace {
    pub fn new(record: bool) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter(&mut self, node: NodeId, run_mode: RunMode) {
        trace!(node = %node, depth = self.depth, ?run_mode, "enter layout");
        self.push(node, TraceEventKind::Enter { run_mode });
        self.depth += 1;
    }

    pub fn leave(&mut self, node: NodeId, size: Size<f32>) {
        self.depth = self.depth.saturating_sub(1);
        trace!(node = %node, depth = self.depth, width = size.width, height = size.height, "leave layout");
        self.push(node, TraceEventKind::Leave { size });
    }

    fn push(&mut self, node: NodeId, kind: TraceEventKind) {
        if self.record {
            self.events.push(TraceEvent {
                node,
                depth: self.depth,
                kind,
            });
        }
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

pub struct LayoutContext<'a> {
    pub(crate) tree: &'a BoxTree,
    pub(crate) config: &'a LayoutConfig,
    pub(crate) text: &'a dyn TextMeasurer,
    pub(crate) cache: IntrinsicCache,
    pub(crate) trace: LayoutTrace,
    /// Intrinsic measurements in progress; keyword sizes on these axes act as `auto`.
    measuring: Vec<(NodeId, Axis)>,
    geometry: Vec<Option<GeometryResult>>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(tree: &'a BoxTree, config: &'a LayoutConfig, text: &'a dyn TextMeasurer) -> Self {
        Self {
            tree,
            config,
            text,
            cache: IntrinsicCache::new(),
            trace: LayoutTrace::new(config.record_trace),
            measuring: Vec::new(),
            geometry: vec![None; tree.len()],
        }
    }

    pub(crate) fn set_geometry(&mut self, node: NodeId, geometry: GeometryResult) {
        if let Some(slot) = self.geometry.get_mut(node.index()) {
            *slot = Some(geometry.sanitized());
        }
    }

    pub(crate) fn begin_measure(&mut self, node: NodeId, axis: Axis) {
        self.measuring.push((node, axis));
    }

    pub(crate) fn end_measure(&mut self) {
        self.measuring.pop();
    }

    pub(crate) fn is_measuring(&self, node: NodeId, axis: Axis) -> bool {
        self.measuring.contains(&(node, axis))
    }

    pub(crate) fn into_parts(self) -> (Vec<Option<GeometryResult>>, LayoutTrace, IntrinsicCache) {
        (self.geometry, self.trace, self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustkit_style::BoxStyle;

    #[test]
    fn test_trace_records_nesting() {
        let mut tree = BoxTree::new();
        let outer = tree.container(BoxStyle::new());
        let inner = tree.container(BoxStyle::new());

        let mut trace = LayoutTrace::new(true);
        trace.enter(outer, RunMode::PerformLayout);
        trace.enter(inner, RunMode::ComputeSize);
        assert_eq!(trace.depth(), 2);
        trace.leave(inner, Size::new(10.0, 5.0));
        trace.leave(outer, Size::new(20.0, 5.0));
        assert_eq!(trace.depth(), 0);

        let events = trace.into_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].node, inner);
        assert_eq!(events[1].depth, 1);
        assert_eq!(events[2].depth, 1);
        assert_eq!(
            events[3].kind,
            TraceEventKind::Leave {
                size: Size::new(20.0, 5.0)
            }
        );
    }

    #[test]
    fn test_trace_without_recording_keeps_nothing() {
        let mut tree = BoxTree::new();
        let node = tree.container(BoxStyle::new());
        let mut trace = LayoutTrace::new(false);
        trace.enter(node, RunMode::ComputeSize);
        trace.leave(node, Size::ZERO);
        assert!(trace.into_events().is_empty());
    }
}
