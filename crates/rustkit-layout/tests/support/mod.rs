//! Shared helpers for the layout integration tests.

#![allow(dead_code)]

use std::sync::Once;

use rustkit_layout::{layout_tree, BoxTree, GeometryResult, LayoutConfig, LayoutOutput, NodeId, Size};
use rustkit_style::{BoxStyle, SizingFunction};
use rustkit_text::TextMeasurer;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Every character except a newline advances by the same amount, whatever the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance(pub f32);

impl TextMeasurer for FixedAdvance {
    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().filter(|c| *c != '\n').count() as f32 * self.0
    }
}

pub const MEASURER: FixedAdvance = FixedAdvance(10.0);

/// A box with a fixed border-box size. Zero leaves the axis `auto`.
pub fn sized(width: f32, height: f32) -> BoxStyle {
    let length = |value: f32| {
        if value > 0.0 {
            SizingFunction::Length(value)
        } else {
            SizingFunction::Auto
        }
    };
    BoxStyle {
        width: length(width),
        height: length(height),
        ..BoxStyle::new()
    }
}

/// Lay out `root` in a viewport with the default config.
pub fn run(tree: &BoxTree, root: NodeId, width: f32, height: f32) -> LayoutOutput {
    run_with(tree, root, width, height, &LayoutConfig::default())
}

pub fn run_with(tree: &BoxTree, root: NodeId, width: f32, height: f32, config: &LayoutConfig) -> LayoutOutput {
    init_tracing();
    layout_tree(tree, root, Size::new(width, height), &MEASURER, config).expect("layout succeeds")
}

#[track_caller]
pub fn geometry(output: &LayoutOutput, node: NodeId) -> GeometryResult {
    *output
        .get(node)
        .unwrap_or_else(|| panic!("node {} has no geometry", node))
}

#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Compare `(x, y, width, height)` within a hundredth of a pixel.
#[track_caller]
pub fn assert_rect(output: &LayoutOutput, node: NodeId, expected: (f32, f32, f32, f32)) {
    let g = geometry(output, node);
    let actual = (g.x, g.y, g.width, g.height);
    let close = |a: f32, b: f32| (a - b).abs() < 0.01;
    assert!(
        close(actual.0, expected.0)
            && close(actual.1, expected.1)
            && close(actual.2, expected.2)
            && close(actual.3, expected.3),
        "node {}: expected {:?}, got {:?}",
        node,
        expected,
        actual
    );
}
