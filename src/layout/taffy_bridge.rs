//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts each content view's `LayoutStyle` to a Taffy style, runs
//! flexbox layout for the whole tree, and writes the results back as view
//! frames.
//!
//! A view's inset becomes its Taffy border, so Taffy's child locations are
//! relative to the parent's frame. Subtracting the parent's inset gives the
//! viewport-relative frames the view tree stores.

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection as TaffyFlexDirection,
    LengthPercentage, LengthPercentageAuto, NodeId, Position as TaffyPosition, Rect as TaffyRect,
    Size, Style, TaffyError, TaffyTree,
};

use crate::engine::{LayoutStyle, ViewId, ViewTree};
use crate::error::{Result, ViewError};
use crate::types::{Dimension, FlexDirection, Position, Rect, Thickness};

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert our Dimension to Taffy's Dimension.
fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(f32::from(n)),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
    }
}

fn to_taffy_border(inset: Thickness) -> TaffyRect<LengthPercentage> {
    let cells = |n: i32| LengthPercentage::Length(n.max(0) as f32);
    TaffyRect {
        top: cells(inset.top),
        right: cells(inset.right),
        bottom: cells(inset.bottom),
        left: cells(inset.left),
    }
}

/// Build a Taffy Style from a view's layout input.
fn build_style(style: &LayoutStyle, inset: Thickness) -> Style {
    let mut taffy_style = Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(style.direction),
        flex_grow: style.grow,
        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        border: to_taffy_border(inset),
        ..Default::default()
    };

    if let Position::Absolute { x, y } = style.position {
        taffy_style.position = TaffyPosition::Absolute;
        taffy_style.inset = TaffyRect {
            top: LengthPercentageAuto::Length(f32::from(y)),
            left: LengthPercentageAuto::Length(f32::from(x)),
            right: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
        };
    }

    taffy_style
}

fn layout_error(err: TaffyError) -> ViewError {
    ViewError::Layout(err.to_string())
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Create the Taffy node for `view` and its visible content subtree.
///
/// Nodes are recorded in post-order.
fn build_node(
    tree: &ViewTree,
    taffy: &mut TaffyTree<()>,
    view: ViewId,
    nodes: &mut Vec<(ViewId, NodeId)>,
) -> Result<NodeId> {
    let node = tree.get(view).ok_or(ViewError::StaleView(view))?;

    let children = node
        .children()
        .iter()
        .copied()
        .filter(|&child| tree.get(child).is_some_and(|n| n.is_visible()))
        .map(|child| build_node(tree, taffy, child, nodes))
        .collect::<Result<Vec<_>>>()?;

    let style = build_style(node.style(), node.inset());
    let id = taffy.new_with_children(style, &children).map_err(layout_error)?;
    nodes.push((view, id));
    Ok(id)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute frames for every visible view in `tree`.
///
/// The root is laid out at the screen origin; an `Auto` root dimension
/// fills the terminal. Decorations are sized to their owner's frame.
/// Invisible views and their subtrees keep their previous frames.
pub fn compute_layout(tree: &mut ViewTree, terminal_width: u16, terminal_height: u16) -> Result<()> {
    let root = tree.root().ok_or(ViewError::NoRoot)?;

    let mut taffy: TaffyTree<()> = TaffyTree::new();
    let mut nodes = Vec::with_capacity(tree.len());
    let root_node = build_node(tree, &mut taffy, root, &mut nodes)?;

    // The root fills the terminal unless sized explicitly
    let mut root_style = taffy.style(root_node).map_err(layout_error)?.clone();
    if root_style.size.width == TaffyDimension::Auto {
        root_style.size.width = TaffyDimension::Length(f32::from(terminal_width));
    }
    if root_style.size.height == TaffyDimension::Auto {
        root_style.size.height = TaffyDimension::Length(f32::from(terminal_height));
    }
    taffy.set_style(root_node, root_style).map_err(layout_error)?;

    let available = Size {
        width: AvailableSpace::Definite(f32::from(terminal_width)),
        height: AvailableSpace::Definite(f32::from(terminal_height)),
    };
    taffy.compute_layout(root_node, available).map_err(layout_error)?;

    for (view, node_id) in nodes {
        let layout = taffy.layout(node_id).map_err(layout_error)?;
        let x = layout.location.x.round() as i32;
        let y = layout.location.y.round() as i32;
        let width = layout.size.width.round() as i32;
        let height = layout.size.height.round() as i32;

        let parent_inset = tree
            .parent(view)
            .and_then(|parent| tree.get(parent))
            .map(|parent| parent.inset())
            .unwrap_or(Thickness::ZERO);
        let frame = Rect::new(x - parent_inset.left, y - parent_inset.top, width, height);
        tree.set_frame(view, frame)?;

        for decoration in tree.decorations(view).to_vec() {
            tree.set_frame(decoration, Rect::new(0, 0, width, height))?;
        }
    }

    log::trace!("layout computed for {terminal_width}x{terminal_height}");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
