//! View (render node) capability set
//!
//! A view owns a handle, accepts named properties, carries the bounds it
//! was last laid out at and records repaint requests. Tree structure lives
//! in the engine's arena, not in the nodes.

use crate::{Properties, Rect, Var, ViewId};
use std::fmt;

bitflags::bitflags! {
    /// What a node can do, queried instead of downcasting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        /// Re-measures when its text-leaf children change
        const MEASURES_TEXT = 1 << 0;
        /// Cannot host children
        const IS_LEAF = 1 << 1;
        /// Paired with a layout node
        const HAS_LAYOUT = 1 << 2;
        /// Content may exceed bounds and scroll
        const SCROLLS = 1 << 3;
    }
}

/// Fixed kind tag of a render node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Generic container
    View,
    /// Text container hosting raw text leaves
    Text,
    /// String payload with no layout counterpart
    RawText,
    Image,
    ScrollView,
}

impl ViewKind {
    /// Default capabilities for the kind
    pub fn capabilities(self) -> Capabilities {
        match self {
            ViewKind::View => Capabilities::HAS_LAYOUT,
            ViewKind::Text => Capabilities::HAS_LAYOUT | Capabilities::MEASURES_TEXT,
            ViewKind::RawText => Capabilities::IS_LEAF,
            ViewKind::Image => Capabilities::HAS_LAYOUT | Capabilities::IS_LEAF,
            ViewKind::ScrollView => Capabilities::HAS_LAYOUT | Capabilities::SCROLLS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::View => "View",
            ViewKind::Text => "Text",
            ViewKind::RawText => "RawText",
            ViewKind::Image => "Image",
            ViewKind::ScrollView => "ScrollView",
        }
    }
}

/// State every view carries
#[derive(Debug, Clone)]
pub struct ViewBase {
    id: ViewId,
    props: Properties,
    bounds: Rect,
    paint_requests: u64,
}

impl ViewBase {
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            props: Properties::new(),
            bounds: Rect::default(),
            paint_requests: 0,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut Properties {
        &mut self.props
    }
}

/// Render node
///
/// Implementors provide `kind` and access to their `ViewBase`; everything
/// else has a default that stores into the base.
pub trait View: fmt::Debug {
    fn kind(&self) -> ViewKind;

    fn base(&self) -> &ViewBase;

    fn base_mut(&mut self) -> &mut ViewBase;

    fn view_id(&self) -> ViewId {
        self.base().id()
    }

    fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    /// Apply a named property. Unknown names are kept but otherwise ignored.
    fn set_property(&mut self, name: &str, value: &Var) {
        let props = self.base_mut().props_mut();
        if value.is_undefined() {
            props.shift_remove(name);
        } else {
            props.insert(name.to_string(), value.clone());
        }
    }

    fn property(&self, name: &str) -> Option<&Var> {
        self.base().props.get(name)
    }

    /// Externally assigned reference tag
    fn ref_id(&self) -> Option<&str> {
        self.property("refId").and_then(Var::as_str)
    }

    /// Replace the string payload. Only text leaves accept this.
    fn set_text(&mut self, _text: &str) -> bool {
        false
    }

    fn text(&self) -> Option<&str> {
        None
    }

    fn bounds(&self) -> Rect {
        self.base().bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        if self.base().bounds != bounds {
            self.base_mut().bounds = bounds;
            self.repaint();
        }
    }

    /// Request a repaint
    fn repaint(&mut self) {
        self.base_mut().paint_requests += 1;
    }

    /// Number of repaint requests so far
    fn paint_requests(&self) -> u64 {
        self.base().paint_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(ViewKind::Text.capabilities().contains(Capabilities::MEASURES_TEXT));
        assert!(!ViewKind::RawText.capabilities().contains(Capabilities::HAS_LAYOUT));
        assert!(ViewKind::Image.capabilities().contains(Capabilities::IS_LEAF));
        assert!(ViewKind::ScrollView.capabilities().contains(Capabilities::SCROLLS));
    }

    #[test]
    fn test_base_starts_clean() {
        let base = ViewBase::new(ViewId::ROOT);
        assert_eq!(base.id(), ViewId::ROOT);
        assert!(base.props().is_empty());
    }
}
