//! Blueprint Layout
//!
//! Layout nodes ("shadow views") and the flexbox pass that sizes them.
//!
//! The layout algorithm is taffy. Each pass builds a fresh taffy tree from
//! the layout side of the view arena, computes it with the root sized to the
//! viewport and hands back one bounds rectangle per node.

mod shadow;
mod style;
mod text_measure;

pub use shadow::{FlexShadowView, ScrollContentShadowView, ShadowView, TextShadowView};
pub use style::{apply_style_property, default_style};
pub use text_measure::{measure_text, string_width, wrap_lines, TextStyle};

use blueprint_view::{Rect, ViewId};
use taffy::{AvailableSpace, Dimension, NodeId, Size, Style, TaffyError, TaffyTree};

/// Layout error
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("view {0} has no layout node")]
    MissingShadow(ViewId),

    #[error("layout engine failure: {0}")]
    Engine(String),
}

impl From<TaffyError> for LayoutError {
    fn from(err: TaffyError) -> Self {
        LayoutError::Engine(err.to_string())
    }
}

/// Read access to the layout side of a view tree
pub trait ShadowTree {
    /// Layout node of `id`, `None` for text leaves
    fn shadow(&self, id: ViewId) -> Option<&dyn ShadowView>;

    /// Layout children of `id`, in order
    fn shadow_children(&self, id: ViewId) -> &[ViewId];

    /// Concatenated payload of the text leaves under a text-measuring node
    fn text_content(&self, id: ViewId) -> String;
}

/// Bounds computed for every node reachable from the root
pub type ComputedLayout = Vec<(ViewId, Rect)>;

/// Measure context attached to text-measuring taffy leaves
struct MeasureContext {
    text: String,
    style: TextStyle,
}

/// Compute the layout of the tree under `root` for a `width` x `height`
/// viewport.
///
/// Returned bounds are relative to each node's parent.
pub fn compute_layout<T: ShadowTree + ?Sized>(
    tree: &T,
    root: ViewId,
    width: f32,
    height: f32,
) -> Result<ComputedLayout, LayoutError> {
    let width = width.max(0.0);
    let height = height.max(0.0);

    let root_shadow = tree.shadow(root).ok_or(LayoutError::MissingShadow(root))?;
    let mut root_style = root_shadow.style().clone();
    root_style.size = Size {
        width: Dimension::Length(width),
        height: Dimension::Length(height),
    };

    let mut taffy: TaffyTree<MeasureContext> = TaffyTree::new();
    let root_node = new_node(&mut taffy, tree, root, root_shadow, root_style)?;

    let mut nodes: Vec<(ViewId, NodeId)> = vec![(root, root_node)];
    let mut stack = vec![(root, root_node)];

    while let Some((id, node)) = stack.pop() {
        let mut child_nodes = Vec::new();

        for &child in tree.shadow_children(id) {
            let shadow = tree.shadow(child).ok_or(LayoutError::MissingShadow(child))?;
            let child_node = new_node(&mut taffy, tree, child, shadow, shadow.style().clone())?;
            nodes.push((child, child_node));
            child_nodes.push(child_node);
            stack.push((child, child_node));
        }

        if !child_nodes.is_empty() {
            taffy.set_children(node, &child_nodes)?;
        }
    }

    let available = Size {
        width: AvailableSpace::Definite(width),
        height: AvailableSpace::Definite(height),
    };

    taffy.compute_layout_with_measure(
        root_node,
        available,
        |known_dimensions: Size<Option<f32>>,
         available_space: Size<AvailableSpace>,
         _node_id: NodeId,
         context: Option<&mut MeasureContext>,
         _style: &Style| match context {
            Some(ctx) => measure_text(&ctx.text, &ctx.style, known_dimensions, available_space),
            None => Size::ZERO,
        },
    )?;

    let mut computed = Vec::with_capacity(nodes.len());
    for (id, node) in nodes {
        let layout = taffy.layout(node)?;
        computed.push((
            id,
            Rect::from_xywh(
                layout.location.x,
                layout.location.y,
                layout.size.width,
                layout.size.height,
            ),
        ));
    }

    tracing::trace!("Layout complete: {} nodes", computed.len());

    Ok(computed)
}

fn new_node<T: ShadowTree + ?Sized>(
    taffy: &mut TaffyTree<MeasureContext>,
    tree: &T,
    id: ViewId,
    shadow: &dyn ShadowView,
    style: Style,
) -> Result<NodeId, LayoutError> {
    let node = match shadow.text_style() {
        Some(text_style) => taffy.new_leaf_with_context(
            style,
            MeasureContext {
                text: tree.text_content(id),
                style: *text_style,
            },
        )?,
        None => taffy.new_leaf(style)?,
    };
    Ok(node)
}
