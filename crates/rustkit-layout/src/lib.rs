//! # RustKit Layout
//!
//! Constraint-based box layout for the RustKit browser engine.
//! Turns a styled [`BoxTree`] into pixel geometry.
//!
//! ## Design Goals
//!
//! 1. **Flexbox**: Line breaking, flexible length resolution with freezing, cross-axis alignment
//! 2. **Grid**: Line resolution, auto-placement with an occupancy matrix, track sizing
//! 3. **Intrinsic sizing**: Min-content and max-content contributions, cached per call
//! 4. **Bounded work**: Every loop has a configured cap, so no call can hang
//! 5. **No panics**: Bad input degrades to the CSS default
//!
//! ## Coordinates
//!
//! All sizes are border-box sizes. A [`GeometryResult`]'s `x`/`y` are relative to
//! the parent's content box; the root's are relative to the viewport.

mod align;
mod block;
mod compute;
mod config;
mod context;
mod flex;
mod freeze;
mod geometry;
mod grid;
mod intrinsic;
mod intrinsic_cache;
mod resolve;
mod tree;

pub use align::{align_single, distribute, DistributionMode};
pub use compute::RunMode;
pub use config::LayoutConfig;
pub use context::{LayoutTrace, TraceEvent, TraceEventKind};
pub use freeze::{resolve_flexible_lengths, FlexibleItem, FreezeReport, Resolution};
pub use geometry::{AvailableSpace, Axis, EdgeSizes, GeometryResult, Rect, Size};
pub use intrinsic_cache::{CacheStats, IntrinsicCache, IntrinsicSizingMode};
pub use tree::{BoxKind, BoxNode, BoxTree, NodeId, TreeError};

use rustkit_text::TextMeasurer;
use thiserror::Error;
use tracing::debug;

use crate::compute::{layout_node, LayoutInput};
use crate::context::LayoutContext;
use crate::resolve::{resolve_box, resolve_margins};

/// Errors that can occur in layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Unknown layout root: {0}")]
    UnknownNode(NodeId),

    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Box tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Geometry for every laid-out node of one [`layout_tree`] call.
#[derive(Debug, Clone, Default)]
pub struct LayoutOutput {
    /// Indexed by [`NodeId::index`]. `None` for nodes layout never placed.
    pub geometry: Vec<Option<GeometryResult>>,
    pub root: Option<NodeId>,
    /// Enter/leave events, when [`LayoutConfig::record_trace`] is set.
    pub trace: Vec<TraceEvent>,
    pub cache_stats: CacheStats,
}

impl LayoutOutput {
    pub fn get(&self, node: NodeId) -> Option<&GeometryResult> {
        self.geometry.get(node.index()).and_then(Option::as_ref)
    }

    pub fn root_geometry(&self) -> Option<&GeometryResult> {
        self.root.and_then(|root| self.get(root))
    }
}

/// Lay out the subtree under `root` inside a `viewport`-sized initial containing block.
///
/// An auto-width root fills the viewport width less its margins. The root's
/// height is its content height unless the style fixes it.
pub fn layout_tree(
    tree: &BoxTree,
    root: NodeId,
    viewport: Size<f32>,
    text: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> Result<LayoutOutput, LayoutError> {
    if !tree.contains(root) {
        return Err(LayoutError::UnknownNode(root));
    }
    let valid = |value: f32| value.is_finite() && value >= 0.0;
    if !valid(viewport.width) || !valid(viewport.height) {
        return Err(LayoutError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let mut ctx = LayoutContext::new(tree, config, text);
    let style = tree.style(root);
    let viewport_size = viewport.map(Some);
    let (margin, _) = resolve_margins(style, Some(viewport.width));
    let available = Size::new(
        (viewport.width - margin.horizontal()).max(0.0),
        (viewport.height - margin.vertical()).max(0.0),
    );

    let stretch = style.width.is_auto() && !matches!(tree.get(root).kind, BoxKind::Replaced { .. });
    let known_width = if stretch {
        let resolved = resolve_box(&mut ctx, root, viewport_size, Size::NONE);
        Some(resolved.clamp(Axis::Horizontal, available.width))
    } else {
        None
    };

    let measured = layout_node(
        &mut ctx,
        root,
        LayoutInput {
            known_size: Size::new(known_width, None),
            parent_size: viewport_size,
            available_space: available.map(AvailableSpace::Definite),
            run_mode: RunMode::ComputeSize,
        },
    );
    let layout = layout_node(&mut ctx, root, LayoutInput::perform(measured.size, viewport_size));

    ctx.set_geometry(
        root,
        GeometryResult {
            x: margin.left,
            y: margin.top,
            width: layout.size.width,
            height: layout.size.height,
            content_size: layout.content_size,
        },
    );

    let (geometry, trace, cache) = ctx.into_parts();
    let cache_stats = cache.stats();
    debug!(
        root = %root,
        width = layout.size.width,
        height = layout.size.height,
        hits = cache_stats.hits,
        lookups = cache_stats.lookups,
        "layout tree"
    );

    Ok(LayoutOutput {
        geometry,
        root: Some(root),
        trace: trace.into_events(),
        cache_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustkit_style::{BoxStyle, Length, SizingFunction};
    use rustkit_text::ApproximateMeasurer;

    fn viewport() -> Size<f32> {
        Size::new(800.0, 600.0)
    }

    #[test]
    fn test_rejects_unknown_root() {
        let tree = BoxTree::new();
        let mut other = BoxTree::new();
        let stray = other.container(BoxStyle::new());

        let result = layout_tree(&tree, stray, viewport(), &ApproximateMeasurer::default(), &LayoutConfig::default());
        assert_eq!(result.unwrap_err(), LayoutError::UnknownNode(stray));
    }

    #[test]
    fn test_rejects_invalid_viewport() {
        let mut tree = BoxTree::new();
        let root = tree.container(BoxStyle::new());
        let measurer = ApproximateMeasurer::default();
        let config = LayoutConfig::default();

        for (width, height) in [(-1.0, 10.0), (f32::NAN, 10.0), (10.0, f32::INFINITY)] {
            let result = layout_tree(&tree, root, Size::new(width, height), &measurer, &config);
            assert!(
                matches!(result, Err(LayoutError::InvalidViewport { .. })),
                "viewport {}x{} should be rejected",
                width,
                height
            );
        }
    }

    #[test]
    fn test_tree_error_converts() {
        let error: LayoutError = TreeError::NotAContainer(NodeId::from_index(3)).into();
        assert_eq!(error.to_string(), "Box tree error: Node #3 is a leaf and cannot have children");
    }

    #[test]
    fn test_root_fills_viewport_width() {
        let mut tree = BoxTree::new();
        let mut child_style = BoxStyle::new();
        child_style.height = SizingFunction::Length(40.0);
        let child = tree.container(child_style);
        let root = tree
            .with_children(BoxStyle::new().with_margin(Length::Px(10.0)), &[child])
            .unwrap();

        let output = layout_tree(&tree, root, viewport(), &ApproximateMeasurer::default(), &LayoutConfig::default())
            .unwrap();

        let root_geometry = output.root_geometry().unwrap();
        assert_eq!(root_geometry.border_box(), Rect::new(10.0, 10.0, 780.0, 40.0));
        assert_eq!(output.get(child).unwrap().border_box(), Rect::new(0.0, 0.0, 780.0, 40.0));
    }

    #[test]
    fn test_records_trace_when_asked() {
        let mut tree = BoxTree::new();
        let root = tree.container(BoxStyle::new());
        let measurer = ApproximateMeasurer::default();

        let quiet = layout_tree(&tree, root, viewport(), &measurer, &LayoutConfig::default()).unwrap();
        assert!(quiet.trace.is_empty());

        let traced = layout_tree(&tree, root, viewport(), &measurer, &LayoutConfig::new().with_trace(true)).unwrap();
        assert!(!traced.trace.is_empty());
        let first = traced.trace[0];
        assert_eq!(first.node, root);
        assert_eq!(first.depth, 0);
        assert!(matches!(first.kind, TraceEventKind::Enter { .. }));
    }
}
