//! Tree Mutator
//!
//! Applies script mutations to both halves of the registry's pairs. Every
//! mutation that can change geometry is followed by a full layout pass.

use crate::error::{BridgeError, Result};
use crate::layout::run_layout;
use crate::registry::{ViewFactory, ViewRegistry};
use blueprint_view::{Capabilities, Var, ViewId};

/// The dual render/layout tree of one application root
#[derive(Debug)]
pub struct ViewTree {
    registry: ViewRegistry,
    width: f32,
    height: f32,
    layout_passes: u64,
}

impl ViewTree {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            registry: ViewRegistry::new(),
            width,
            height,
            layout_passes: 0,
        }
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ViewRegistry {
        &mut self.registry
    }

    pub fn register_view_type(&mut self, name: &str, factory: ViewFactory) -> Result<()> {
        self.registry.register_view_type(name, factory)
    }

    pub fn create_view(&mut self, type_name: &str) -> Result<ViewId> {
        self.registry.create(type_name)
    }

    pub fn create_text(&mut self, text: &str) -> Result<ViewId> {
        self.registry.create_text(text)
    }

    /// Set a property on both halves of a pair. A name one half does not
    /// know is ignored by that half.
    pub fn set_property(&mut self, id: ViewId, name: &str, value: &Var) -> Result<()> {
        let slot = self.registry.slot_mut(id)?;
        let parent = slot.parent();
        let text_leaf = slot.pair.is_text_leaf();

        slot.pair.view.set_property(name, value);
        if let Some(shadow) = slot.pair.shadow.as_mut() {
            shadow.set_property(name, value);
        }
        slot.pair.view.repaint();

        // Text leaves are measured by their parent
        if text_leaf {
            if let Some(parent) = parent {
                self.dirty_text_parent(parent)?;
            }
        }

        tracing::debug!("Set {}.{} = {}", id, name, value);
        self.perform_layout();
        Ok(())
    }

    /// Replace the payload of a raw text leaf
    pub fn set_text(&mut self, id: ViewId, text: &str) -> Result<()> {
        let slot = self.registry.slot_mut(id)?;
        if !slot.pair.is_text_leaf() || !slot.pair.view.set_text(text) {
            return Err(BridgeError::NotRawText(id));
        }
        let parent = slot.parent();

        tracing::debug!("Set text of {} ({} bytes)", id, text.len());

        if let Some(parent) = parent {
            if self.dirty_text_parent(parent)? {
                self.perform_layout();
            }
            self.registry.slot_mut(parent)?.pair.view.repaint();
        }
        Ok(())
    }

    /// Attach `child` under `parent` at `index` (append when `None` or past
    /// the end)
    pub fn add_child(&mut self, parent: ViewId, child: ViewId, index: Option<usize>) -> Result<()> {
        self.check_attachable(parent, child)?;

        let parent_slot = self.registry.slot(parent)?;
        let child_slot = self.registry.slot(child)?;
        let parent_caps = parent_slot.pair.capabilities();

        if parent_slot.pair.measures_text() {
            if !child_slot.pair.is_text_leaf() {
                return Err(BridgeError::TextChildRequired { parent, child });
            }

            // Render side only; the text container re-measures
            let parent_slot = self.registry.slot_mut(parent)?;
            let at = clamp_index(index, parent_slot.children.len());
            parent_slot.children.insert(at, child);
            if let Some(shadow) = parent_slot.pair.shadow.as_mut() {
                shadow.mark_dirty();
            }
        } else {
            if parent_caps.contains(Capabilities::IS_LEAF) {
                return Err(BridgeError::LeafView(parent));
            }
            if child_slot.pair.is_text_leaf() {
                return Err(BridgeError::TextOutsideTextView { parent, child });
            }
            let both_have_layout =
                parent_slot.pair.shadow.is_some() && child_slot.pair.shadow.is_some();

            let parent_slot = self.registry.slot_mut(parent)?;
            let at = clamp_index(index, parent_slot.children.len());
            parent_slot.children.insert(at, child);
            if both_have_layout {
                let at = at.min(parent_slot.shadow_children.len());
                parent_slot.shadow_children.insert(at, child);
            }
        }

        self.registry.slot_mut(child)?.parent = Some(parent);
        self.registry.slot_mut(parent)?.pair.view.repaint();

        tracing::debug!("Added {} to {}", child, parent);
        self.perform_layout();
        Ok(())
    }

    /// Detach `child` from `parent` and drop its whole subtree
    pub fn remove_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        let parent_slot = self.registry.slot(parent)?;
        if !parent_slot.children.contains(&child) {
            return Err(BridgeError::NotAChild { parent, child });
        }
        let measures_text = parent_slot.pair.measures_text();

        // Enumerate before detaching
        let doomed = self.registry.descendants(child)?;

        let parent_slot = self.registry.slot_mut(parent)?;
        parent_slot.children.retain(|id| *id != child);
        parent_slot.shadow_children.retain(|id| *id != child);
        if measures_text {
            if let Some(shadow) = parent_slot.pair.shadow.as_mut() {
                shadow.mark_dirty();
            }
        }
        parent_slot.pair.view.repaint();

        self.registry.slot_mut(child)?.parent = None;
        let removed = self.registry.remove_subtree(child)?;
        debug_assert_eq!(removed.len(), doomed.len());

        tracing::debug!("Removed {} from {} ({} views dropped)", child, parent, removed.len());
        self.perform_layout();
        Ok(())
    }

    /// Resize the viewport and lay out again
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.perform_layout();
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Full layout pass. Failures are logged and leave old bounds in place.
    pub fn perform_layout(&mut self) {
        match run_layout(&mut self.registry, self.width, self.height) {
            Ok(nodes) => {
                self.layout_passes += 1;
                tracing::trace!("Layout pass {} ({} nodes)", self.layout_passes, nodes);
            }
            Err(e) => tracing::error!("Layout failed: {}", e),
        }
    }

    /// Completed layout passes
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    /// Drop every view under the root
    pub fn clear(&mut self) {
        self.registry.clear();
        self.perform_layout();
    }

    fn check_attachable(&self, parent: ViewId, child: ViewId) -> Result<()> {
        if child == ViewId::ROOT {
            return Err(BridgeError::RootAsChild);
        }
        self.registry.slot(parent)?;
        if self.registry.slot(child)?.parent().is_some() {
            return Err(BridgeError::AlreadyAttached(child));
        }

        // `child` must not be `parent` or one of its ancestors
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(BridgeError::CyclicAttach { parent, child });
            }
            current = self.registry.parent(id)?;
        }
        Ok(())
    }

    /// Mark a text container's layout node dirty. Returns whether `parent`
    /// measures text.
    fn dirty_text_parent(&mut self, parent: ViewId) -> Result<bool> {
        let slot = self.registry.slot_mut(parent)?;
        if !slot.pair.measures_text() {
            return Ok(false);
        }
        if let Some(shadow) = slot.pair.shadow.as_mut() {
            shadow.mark_dirty();
        }
        Ok(true)
    }
}

fn clamp_index(index: Option<usize>, len: usize) -> usize {
    index.map_or(len, |i| i.min(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::install_builtin_view_types;

    fn tree() -> ViewTree {
        let mut tree = ViewTree::new(100.0, 100.0);
        install_builtin_view_types(tree.registry_mut()).unwrap();
        tree
    }

    #[test]
    fn test_add_child_both_sides() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        let b = tree.create_view("View").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        tree.add_child(ViewId::ROOT, b, Some(0)).unwrap();

        let registry = tree.registry();
        assert_eq!(registry.children(ViewId::ROOT).unwrap(), &[b, a]);
        assert_eq!(registry.shadow_children(ViewId::ROOT).unwrap(), &[b, a]);
        assert_eq!(registry.parent(a).unwrap(), Some(ViewId::ROOT));
    }

    #[test]
    fn test_index_past_end_appends() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        let b = tree.create_view("View").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        tree.add_child(ViewId::ROOT, b, Some(10)).unwrap();
        assert_eq!(tree.registry().children(ViewId::ROOT).unwrap(), &[a, b]);
    }

    #[test]
    fn test_text_child_render_side_only() {
        let mut tree = tree();
        let text = tree.create_view("Text").unwrap();
        let leaf = tree.create_text("hi").unwrap();
        tree.add_child(text, leaf, None).unwrap();

        assert_eq!(tree.registry().children(text).unwrap(), &[leaf]);
        assert!(tree.registry().shadow_children(text).unwrap().is_empty());
    }

    #[test]
    fn test_text_container_rejects_views() {
        let mut tree = tree();
        let text = tree.create_view("Text").unwrap();
        let view = tree.create_view("View").unwrap();
        assert!(matches!(
            tree.add_child(text, view, None),
            Err(BridgeError::TextChildRequired { .. })
        ));
    }

    #[test]
    fn test_raw_text_outside_text_view() {
        let mut tree = tree();
        let leaf = tree.create_text("hi").unwrap();
        assert!(matches!(
            tree.add_child(ViewId::ROOT, leaf, None),
            Err(BridgeError::TextOutsideTextView { .. })
        ));
    }

    #[test]
    fn test_leaf_rejects_children() {
        let mut tree = tree();
        let image = tree.create_view("Image").unwrap();
        let view = tree.create_view("View").unwrap();
        assert!(matches!(tree.add_child(image, view, None), Err(BridgeError::LeafView(_))));
    }

    #[test]
    fn test_double_attach_rejected() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        let b = tree.create_view("View").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        assert!(matches!(
            tree.add_child(b, a, None),
            Err(BridgeError::AlreadyAttached(_))
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        let b = tree.create_view("View").unwrap();
        tree.add_child(a, b, None).unwrap();
        assert!(matches!(tree.add_child(b, a, None), Err(BridgeError::CyclicAttach { .. })));
        assert!(matches!(tree.add_child(a, a, None), Err(BridgeError::CyclicAttach { .. })));
        assert!(matches!(
            tree.add_child(a, ViewId::ROOT, None),
            Err(BridgeError::RootAsChild)
        ));
    }

    #[test]
    fn test_remove_child_drops_subtree() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        let text = tree.create_view("Text").unwrap();
        let leaf = tree.create_text("x").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        tree.add_child(a, text, None).unwrap();
        tree.add_child(text, leaf, None).unwrap();

        tree.remove_child(ViewId::ROOT, a).unwrap();

        for id in [a, text, leaf] {
            assert!(matches!(tree.registry().lookup(id), Err(BridgeError::UnknownView(_))));
        }
        assert!(tree.registry().children(ViewId::ROOT).unwrap().is_empty());
        assert!(tree.registry().is_empty());
    }

    #[test]
    fn test_remove_non_child() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        assert!(matches!(
            tree.remove_child(ViewId::ROOT, a),
            Err(BridgeError::NotAChild { .. })
        ));
        assert!(tree.registry().contains(a));
    }

    #[test]
    fn test_set_text_on_view_rejected() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        assert!(matches!(tree.set_text(a, "x"), Err(BridgeError::NotRawText(_))));
    }

    #[test]
    fn test_set_property_reaches_both_sides() {
        let mut tree = tree();
        let a = tree.create_view("View").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        tree.set_property(a, "height", &Var::from(40)).unwrap();
        tree.set_property(a, "backgroundColor", &Var::from("red")).unwrap();

        let (view, _) = tree.registry().lookup(a).unwrap();
        assert_eq!(view.property("backgroundColor"), Some(&Var::from("red")));
        assert_eq!(view.bounds().height, 40.0);
    }

    #[test]
    fn test_mutations_run_layout() {
        let mut tree = tree();
        let before = tree.layout_passes();
        let a = tree.create_view("View").unwrap();
        tree.add_child(ViewId::ROOT, a, None).unwrap();
        tree.set_property(a, "width", &Var::from(10)).unwrap();
        tree.remove_child(ViewId::ROOT, a).unwrap();
        assert_eq!(tree.layout_passes(), before + 3);
    }

    #[test]
    fn test_viewport_sizes_root() {
        let mut tree = tree();
        tree.set_viewport(320.0, 240.0);
        let (root, _) = tree.registry().lookup(ViewId::ROOT).unwrap();
        assert_eq!((root.bounds().width, root.bounds().height), (320.0, 240.0));
    }
}
