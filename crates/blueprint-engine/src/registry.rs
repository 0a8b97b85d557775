//! View Registry
//!
//! Arena of render/layout pairs keyed by `ViewId`, plus the factory table
//! of view types. The root pair lives in its own slot and is never removed.

use crate::error::{BridgeError, Result};
use blueprint_layout::{FlexShadowView, ShadowView};
use blueprint_view::{BasicView, Capabilities, RawTextView, View, ViewId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;

/// A render node and its layout counterpart
#[derive(Debug)]
pub struct ViewPair {
    pub view: Box<dyn View>,
    pub shadow: Option<Box<dyn ShadowView>>,
}

impl ViewPair {
    pub fn new(view: impl View + 'static, shadow: impl ShadowView + 'static) -> Self {
        Self {
            view: Box::new(view),
            shadow: Some(Box::new(shadow)),
        }
    }

    /// Pair without a layout node
    pub fn render_only(view: impl View + 'static) -> Self {
        Self {
            view: Box::new(view),
            shadow: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.view.capabilities()
    }

    /// Raw text leaf: a leaf with no layout node of its own
    pub fn is_text_leaf(&self) -> bool {
        self.shadow.is_none() && self.capabilities().contains(Capabilities::IS_LEAF)
    }

    /// Text container that re-measures when its raw text children change
    pub fn measures_text(&self) -> bool {
        self.capabilities().contains(Capabilities::MEASURES_TEXT)
    }

    /// Check the pair agrees with its declared capabilities
    fn validate(&self, id: ViewId) -> std::result::Result<(), String> {
        let caps = self.capabilities();

        if self.view.view_id() != id {
            return Err(format!("render node has id {}, expected {}", self.view.view_id(), id));
        }
        if caps.contains(Capabilities::HAS_LAYOUT) != self.shadow.is_some() {
            return Err("layout node presence disagrees with capabilities".to_string());
        }
        if let Some(shadow) = &self.shadow {
            if shadow.view_id() != id {
                return Err(format!("layout node has id {}, expected {}", shadow.view_id(), id));
            }
            if caps.contains(Capabilities::MEASURES_TEXT) != shadow.measures_text() {
                return Err("text measuring disagrees between render and layout node".to_string());
            }
        }
        Ok(())
    }
}

/// Constructor of a view type
pub type ViewFactory = Rc<dyn Fn(ViewId) -> ViewPair>;

/// Registry entry: a pair and its place in both trees
#[derive(Debug)]
pub struct ViewSlot {
    pub pair: ViewPair,
    pub(crate) parent: Option<ViewId>,
    /// Render children, in order
    pub(crate) children: Vec<ViewId>,
    /// Layout children, in order
    pub(crate) shadow_children: Vec<ViewId>,
}

impl ViewSlot {
    fn new(pair: ViewPair) -> Self {
        Self {
            pair,
            parent: None,
            children: Vec::new(),
            shadow_children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn shadow_children(&self) -> &[ViewId] {
        &self.shadow_children
    }
}

/// View registry
pub struct ViewRegistry {
    root: ViewSlot,
    views: HashMap<ViewId, ViewSlot>,
    factories: IndexMap<String, ViewFactory>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            root: ViewSlot::new(root_pair()),
            views: HashMap::new(),
            factories: IndexMap::new(),
        }
    }

    // ========================================================================
    // Factory table
    // ========================================================================

    /// Register a view type under `name`. Names are registered once.
    pub fn register_view_type(&mut self, name: &str, factory: ViewFactory) -> Result<()> {
        if self.factories.contains_key(name) {
            return Err(BridgeError::DuplicateViewType(name.to_string()));
        }
        tracing::debug!("Registered view type {}", name);
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn has_view_type(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered type names, in registration order
    pub fn view_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Instantiate a registered view type
    pub fn create(&mut self, type_name: &str) -> Result<ViewId> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| BridgeError::UnknownViewType(type_name.to_string()))?;

        let id = ViewId::try_next().ok_or(BridgeError::IdsExhausted)?;
        let pair = factory(id);
        pair.validate(id).map_err(|reason| BridgeError::MalformedPair {
            type_name: type_name.to_string(),
            reason,
        })?;

        self.views.insert(id, ViewSlot::new(pair));
        tracing::debug!("Created {} {}", type_name, id);
        Ok(id)
    }

    /// Create a raw text leaf holding `text`
    pub fn create_text(&mut self, text: &str) -> Result<ViewId> {
        let id = ViewId::try_next().ok_or(BridgeError::IdsExhausted)?;
        self.views
            .insert(id, ViewSlot::new(ViewPair::render_only(RawTextView::new(id, text))));
        tracing::debug!("Created raw text {}", id);
        Ok(id)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Render node and layout node of `id`; the layout node is `None` for
    /// text leaves
    pub fn lookup(&self, id: ViewId) -> Result<(&dyn View, Option<&dyn ShadowView>)> {
        let slot = self.slot(id)?;
        Ok((slot.pair.view.as_ref(), slot.pair.shadow.as_deref()))
    }

    pub fn slot(&self, id: ViewId) -> Result<&ViewSlot> {
        if id == ViewId::ROOT {
            return Ok(&self.root);
        }
        self.views.get(&id).ok_or(BridgeError::UnknownView(id))
    }

    pub(crate) fn slot_mut(&mut self, id: ViewId) -> Result<&mut ViewSlot> {
        if id == ViewId::ROOT {
            return Ok(&mut self.root);
        }
        self.views.get_mut(&id).ok_or(BridgeError::UnknownView(id))
    }

    pub fn contains(&self, id: ViewId) -> bool {
        id == ViewId::ROOT || self.views.contains_key(&id)
    }

    pub fn children(&self, id: ViewId) -> Result<&[ViewId]> {
        Ok(self.slot(id)?.children())
    }

    pub fn shadow_children(&self, id: ViewId) -> Result<&[ViewId]> {
        Ok(self.slot(id)?.shadow_children())
    }

    pub fn parent(&self, id: ViewId) -> Result<Option<ViewId>> {
        Ok(self.slot(id)?.parent())
    }

    /// Find a view by its script-assigned `refId`. Not finding one is normal.
    pub fn find_by_ref_id(&self, ref_id: &str) -> Option<ViewId> {
        std::iter::once(&self.root)
            .chain(self.views.values())
            .find(|slot| slot.pair.view.ref_id() == Some(ref_id))
            .map(|slot| slot.pair.view.view_id())
    }

    /// Live views, root excluded
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// `id` and everything below it in the render tree, children before
    /// their parent
    pub fn descendants(&self, id: ViewId) -> Result<Vec<ViewId>> {
        self.slot(id)?;

        let mut order = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            if let Ok(slot) = self.slot(current) {
                for &child in slot.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        Ok(order)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Drop a detached subtree from the arena
    pub fn remove_subtree(&mut self, id: ViewId) -> Result<Vec<ViewId>> {
        if id == ViewId::ROOT {
            return Err(BridgeError::RootAsChild);
        }
        if self.slot(id)?.parent.is_some() {
            return Err(BridgeError::StillAttached(id));
        }

        let removed = self.descendants(id)?;
        for handle in &removed {
            self.views.remove(handle);
        }
        tracing::debug!("Removed {} views under {}", removed.len(), id);
        Ok(removed)
    }

    /// Discard every view and give the root a fresh layout node. The factory
    /// table is kept.
    pub fn clear(&mut self) {
        let count = self.views.len();
        self.views.clear();
        self.root = ViewSlot::new(root_pair());
        tracing::debug!("Cleared registry ({} views)", count);
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.len())
            .field("view_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn root_pair() -> ViewPair {
    ViewPair::new(BasicView::new(ViewId::ROOT), FlexShadowView::new(ViewId::ROOT))
}
