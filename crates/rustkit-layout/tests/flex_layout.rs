mod support;

use rustkit_layout::BoxTree;
use rustkit_style::{
    AlignContent, AlignItems, AlignSelf, BoxStyle, FlexBasis, FlexDirection, FlexWrap, GridTemplate, Length,
    SizingFunction,
};
use support::{assert_close, assert_rect, geometry, run, sized};

fn grow(basis: f32, factor: f32) -> BoxStyle {
    BoxStyle {
        flex_basis: FlexBasis::Length(basis),
        flex_grow: factor,
        ..BoxStyle::new()
    }
}

#[test]
fn test_equal_grow_splits_free_space() {
    let mut tree = BoxTree::new();
    let items: Vec<_> = (0..3).map(|_| tree.container(grow(100.0, 1.0))).collect();
    let root = tree.with_children(BoxStyle::flex(FlexDirection::Row), &items).unwrap();

    let output = run(&tree, root, 400.0, 300.0);

    let third = 400.0 / 3.0;
    for (i, &item) in items.iter().enumerate() {
        let g = geometry(&output, item);
        assert_close(g.width, third);
        assert_close(g.x, third * i as f32);
    }
}

#[test]
fn test_line_sizes_and_gaps_fill_the_container() {
    let mut tree = BoxTree::new();
    let a = tree.container(grow(100.0, 1.0));
    let b = tree.container(grow(100.0, 1.0));
    let c = tree.container(grow(50.0, 2.0));
    let style = BoxStyle::flex(FlexDirection::Row).with_gap(Length::Px(10.0));
    let root = tree.with_children(style, &[a, b, c]).unwrap();

    let output = run(&tree, root, 400.0, 300.0);

    // 130 free: 32.5 each for a and b, 65 for c
    assert_rect(&output, a, (0.0, 0.0, 132.5, 0.0));
    assert_rect(&output, b, (142.5, 0.0, 132.5, 0.0));
    assert_rect(&output, c, (285.0, 0.0, 115.0, 0.0));

    let total: f32 = [a, b, c].iter().map(|&n| geometry(&output, n).width).sum::<f32>() + 20.0;
    assert_close(total, 400.0);
}

#[test]
fn test_auto_min_size_stops_shrinking_at_longest_word() {
    let mut tree = BoxTree::new();
    let word = tree.text(BoxStyle::new(), "abcdefghijklmn");
    let holder = tree.with_children(BoxStyle::new(), &[word]).unwrap();
    let sibling = tree.container(BoxStyle {
        flex_basis: FlexBasis::Length(50.0),
        ..BoxStyle::new()
    });
    let root = tree
        .with_children(BoxStyle::flex(FlexDirection::Row), &[holder, sibling])
        .unwrap();

    let output = run(&tree, root, 100.0, 300.0);

    // one 140px word: the holder freezes at its min-content width
    assert_rect(&output, holder, (0.0, 0.0, 140.0, 19.2));
    assert_rect(&output, sibling, (140.0, 0.0, 0.0, 19.2));
    assert_close(geometry(&output, root).content_size.width, 140.0);
}

#[test]
fn test_zero_min_width_lets_item_shrink() {
    let mut tree = BoxTree::new();
    let word = tree.text(BoxStyle::new(), "abcdefghijklmn");
    let holder = tree
        .with_children(
            BoxStyle {
                min_width: SizingFunction::Length(0.0),
                ..BoxStyle::new()
            },
            &[word],
        )
        .unwrap();
    let root = tree.with_children(BoxStyle::flex(FlexDirection::Row), &[holder]).unwrap();

    let output = run(&tree, root, 100.0, 300.0);
    assert_close(geometry(&output, holder).width, 100.0);
}

#[test]
fn test_column_grow_and_cross_stretch() {
    let mut tree = BoxTree::new();
    let top = tree.container(grow(0.0, 1.0));
    let bottom = tree.container(grow(0.0, 2.0));
    let style = BoxStyle {
        height: SizingFunction::Length(300.0),
        ..BoxStyle::flex(FlexDirection::Column)
    };
    let root = tree.with_children(style, &[top, bottom]).unwrap();

    let output = run(&tree, root, 400.0, 600.0);

    assert_rect(&output, root, (0.0, 0.0, 400.0, 300.0));
    assert_rect(&output, top, (0.0, 0.0, 400.0, 100.0));
    assert_rect(&output, bottom, (0.0, 100.0, 400.0, 200.0));
}

#[test]
fn test_wrap_reverse_stacks_lines_from_the_bottom() {
    let mut tree = BoxTree::new();
    let items: Vec<_> = (0..3).map(|_| tree.container(sized(60.0, 20.0))).collect();
    let style = BoxStyle {
        flex_wrap: FlexWrap::WrapReverse,
        align_content: AlignContent::FlexStart,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::Row)
    };
    let root = tree.with_children(style, &items).unwrap();

    let output = run(&tree, root, 100.0, 600.0);

    assert_rect(&output, items[0], (0.0, 80.0, 60.0, 20.0));
    assert_rect(&output, items[1], (0.0, 60.0, 60.0, 20.0));
    assert_rect(&output, items[2], (0.0, 40.0, 60.0, 20.0));
}

#[test]
fn test_wrap_stretches_lines_by_default() {
    let mut tree = BoxTree::new();
    let a = tree.container(BoxStyle {
        width: SizingFunction::Length(60.0),
        ..BoxStyle::new()
    });
    let b = tree.container(sized(60.0, 20.0));
    let style = BoxStyle {
        flex_wrap: FlexWrap::Wrap,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::Row)
    };
    let root = tree.with_children(style, &[a, b]).unwrap();

    let output = run(&tree, root, 100.0, 600.0);

    // lines of 0 and 20 share 80 spare: 40 and 60
    assert_rect(&output, a, (0.0, 0.0, 60.0, 40.0));
    assert_rect(&output, b, (0.0, 40.0, 60.0, 20.0));
}

#[test]
fn test_nested_grid_inside_flex() {
    let mut tree = BoxTree::new();
    let left = tree.container(sized(0.0, 20.0));
    let right = tree.container(sized(0.0, 20.0));
    let grid_style = BoxStyle {
        width: SizingFunction::Length(300.0),
        ..BoxStyle::grid(
            GridTemplate::from_sizes([SizingFunction::Fr(1.0), SizingFunction::Fr(2.0)]),
            GridTemplate::none(),
        )
    };
    let grid = tree.with_children(grid_style, &[left, right]).unwrap();
    let filler = tree.container(grow(0.0, 1.0));
    let root = tree
        .with_children(BoxStyle::flex(FlexDirection::Row), &[grid, filler])
        .unwrap();

    let output = run(&tree, root, 600.0, 400.0);

    assert_rect(&output, grid, (0.0, 0.0, 300.0, 20.0));
    assert_rect(&output, filler, (300.0, 0.0, 300.0, 20.0));
    assert_rect(&output, left, (0.0, 0.0, 100.0, 20.0));
    assert_rect(&output, right, (100.0, 0.0, 200.0, 20.0));
}

#[test]
fn test_padding_offsets_content_box() {
    let mut tree = BoxTree::new();
    let item = tree.container(grow(0.0, 1.0));
    let style = BoxStyle::flex(FlexDirection::Row)
        .with_padding(Length::Px(10.0))
        .with_border(Length::Px(2.0));
    let root = tree.with_children(style, &[item]).unwrap();

    let output = run(&tree, root, 200.0, 100.0);

    assert_rect(&output, root, (0.0, 0.0, 200.0, 24.0));
    assert_rect(&output, item, (0.0, 0.0, 176.0, 0.0));
}

#[test]
fn test_column_wrap_with_auto_height_keeps_one_line() {
    let mut tree = BoxTree::new();
    let items: Vec<_> = (0..10).map(|_| tree.container(sized(50.0, 100.0))).collect();
    let style = BoxStyle {
        flex_wrap: FlexWrap::Wrap,
        ..BoxStyle::flex(FlexDirection::Column)
    };
    let root = tree.with_children(style, &items).unwrap();

    let output = run(&tree, root, 800.0, 600.0);

    assert_rect(&output, root, (0.0, 0.0, 800.0, 1000.0));
    for (i, &item) in items.iter().enumerate() {
        assert_rect(&output, item, (0.0, 100.0 * i as f32, 50.0, 100.0));
    }
}

#[test]
fn test_column_wrap_with_fixed_height_breaks_lines() {
    let mut tree = BoxTree::new();
    let items: Vec<_> = (0..3).map(|_| tree.container(sized(50.0, 100.0))).collect();
    let style = BoxStyle {
        flex_wrap: FlexWrap::Wrap,
        align_content: AlignContent::FlexStart,
        height: SizingFunction::Length(250.0),
        ..BoxStyle::flex(FlexDirection::Column)
    };
    let root = tree.with_children(style, &items).unwrap();

    let output = run(&tree, root, 800.0, 600.0);

    assert_rect(&output, root, (0.0, 0.0, 800.0, 250.0));
    assert_rect(&output, items[1], (0.0, 100.0, 50.0, 100.0));
    assert_rect(&output, items[2], (50.0, 0.0, 50.0, 100.0));
}

#[test]
fn test_cross_axis_self_alignment() {
    let mut tree = BoxTree::new();
    let centered = tree.container(sized(40.0, 20.0));
    let at_end = tree.container(BoxStyle {
        align_self: AlignSelf::FlexEnd,
        ..sized(40.0, 20.0)
    });
    let pushed = tree.container(BoxStyle {
        margin_top: Length::Auto,
        ..sized(40.0, 20.0)
    });
    let physical_end = tree.container(BoxStyle {
        align_self: AlignSelf::End,
        ..sized(40.0, 30.0)
    });
    let style = BoxStyle {
        align_items: AlignItems::Center,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::Row)
    };
    let root = tree
        .with_children(style, &[centered, at_end, pushed, physical_end])
        .unwrap();

    let output = run(&tree, root, 400.0, 600.0);

    assert_rect(&output, centered, (0.0, 40.0, 40.0, 20.0));
    assert_rect(&output, at_end, (40.0, 80.0, 40.0, 20.0));
    assert_rect(&output, pushed, (80.0, 80.0, 40.0, 20.0));
    assert_rect(&output, physical_end, (120.0, 70.0, 40.0, 30.0));
}

#[test]
fn test_cross_auto_margins_center_item() {
    let mut tree = BoxTree::new();
    let item = tree.container(BoxStyle {
        margin_top: Length::Auto,
        margin_bottom: Length::Auto,
        ..sized(40.0, 20.0)
    });
    let style = BoxStyle {
        align_items: AlignItems::FlexEnd,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::Row)
    };
    let root = tree.with_children(style, &[item]).unwrap();

    let output = run(&tree, root, 400.0, 600.0);

    // auto margins take the free space before align-items does
    assert_rect(&output, item, (0.0, 40.0, 40.0, 20.0));
}

#[test]
fn test_wrap_reverse_flips_cross_start_per_line() {
    let mut tree = BoxTree::new();
    let tall = tree.container(sized(40.0, 20.0));
    let to_start = tree.container(BoxStyle {
        align_self: AlignSelf::FlexStart,
        ..sized(30.0, 10.0)
    });
    let to_end = tree.container(sized(30.0, 10.0));
    let next_line = tree.container(sized(60.0, 20.0));
    let style = BoxStyle {
        flex_wrap: FlexWrap::WrapReverse,
        align_items: AlignItems::FlexEnd,
        align_content: AlignContent::FlexStart,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::Row)
    };
    let root = tree
        .with_children(style, &[tall, to_start, to_end, next_line])
        .unwrap();

    let output = run(&tree, root, 100.0, 600.0);

    // the first line occupies 80..100; its cross start is the bottom edge
    assert_rect(&output, tall, (0.0, 80.0, 40.0, 20.0));
    assert_rect(&output, to_start, (40.0, 90.0, 30.0, 10.0));
    assert_rect(&output, to_end, (70.0, 80.0, 30.0, 10.0));
    assert_rect(&output, next_line, (0.0, 60.0, 60.0, 20.0));
}

#[test]
fn test_row_reverse_with_wrap_reverse() {
    let mut tree = BoxTree::new();
    let a = tree.container(sized(40.0, 20.0));
    let b = tree.container(sized(60.0, 10.0));
    let style = BoxStyle {
        flex_wrap: FlexWrap::WrapReverse,
        align_items: AlignItems::FlexStart,
        align_content: AlignContent::FlexStart,
        height: SizingFunction::Length(100.0),
        ..BoxStyle::flex(FlexDirection::RowReverse)
    };
    let root = tree.with_children(style, &[a, b]).unwrap();

    let output = run(&tree, root, 100.0, 600.0);

    assert_rect(&output, a, (60.0, 80.0, 40.0, 20.0));
    assert_rect(&output, b, (0.0, 90.0, 60.0, 10.0));
}
