//! Layout Driver
//!
//! Runs a full layout pass over the layout side of the registry and flushes
//! the results into the render nodes.

use crate::registry::{ViewPair, ViewRegistry};
use blueprint_layout::{compute_layout, LayoutError, ShadowTree, ShadowView};
use blueprint_view::ViewId;

impl ShadowTree for ViewRegistry {
    fn shadow(&self, id: ViewId) -> Option<&dyn ShadowView> {
        self.slot(id).ok().and_then(|slot| slot.pair.shadow.as_deref())
    }

    fn shadow_children(&self, id: ViewId) -> &[ViewId] {
        self.slot(id).map(|slot| slot.shadow_children()).unwrap_or(&[])
    }

    fn text_content(&self, id: ViewId) -> String {
        let Ok(slot) = self.slot(id) else {
            return String::new();
        };
        slot.children()
            .iter()
            .filter_map(|child| self.slot(*child).ok())
            .filter_map(|child| child.pair.view.text())
            .collect()
    }
}

/// Lay out the whole tree for a `width` x `height` viewport.
///
/// Returns the number of nodes laid out.
pub fn run_layout(registry: &mut ViewRegistry, width: f32, height: f32) -> Result<usize, LayoutError> {
    let computed = compute_layout(&*registry, ViewId::ROOT, width, height)?;

    for (id, bounds) in &computed {
        let Ok(slot) = registry.slot_mut(*id) else {
            continue;
        };
        let ViewPair { view, shadow } = &mut slot.pair;
        if let Some(shadow) = shadow {
            shadow.set_layout(*bounds);
            shadow.flush(view.as_mut());
        }
    }

    Ok(computed.len())
}
