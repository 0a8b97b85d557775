//! Shadow views (layout nodes)
//!
//! A shadow view holds the layout-relevant half of a node: its style, the
//! bounds computed by the last layout pass, and a dirty flag. Children are
//! tracked by the engine's arena.

use crate::style::{apply_style_property, default_style};
use crate::text_measure::TextStyle;
use blueprint_view::{Rect, Var, View, ViewId};
use std::fmt;
use taffy::{Dimension, Overflow, Style};

/// Layout node capability set
pub trait ShadowView: fmt::Debug {
    fn view_id(&self) -> ViewId;

    fn style(&self) -> &Style;

    /// Apply a named property. Returns `false` if this node does not know it.
    fn set_property(&mut self, name: &str, value: &Var) -> bool;

    /// Text metrics; `Some` for nodes that measure their text children
    fn text_style(&self) -> Option<&TextStyle> {
        None
    }

    fn measures_text(&self) -> bool {
        self.text_style().is_some()
    }

    fn mark_dirty(&mut self);

    fn is_dirty(&self) -> bool;

    /// Bounds from the last layout pass, relative to the parent
    fn layout(&self) -> Rect;

    /// Store freshly computed bounds and clear the dirty flag
    fn set_layout(&mut self, bounds: Rect);

    /// Push computed bounds into the paired render node
    fn flush(&self, view: &mut dyn View) {
        view.set_bounds(self.layout());
    }
}

/// Flexbox node used by most view types
#[derive(Debug, Clone)]
pub struct FlexShadowView {
    id: ViewId,
    style: Style,
    layout: Rect,
    dirty: bool,
}

impl FlexShadowView {
    pub fn new(id: ViewId) -> Self {
        Self::with_style(id, default_style())
    }

    pub fn with_style(id: ViewId, style: Style) -> Self {
        Self {
            id,
            style,
            layout: Rect::default(),
            dirty: true,
        }
    }

    /// Flex node of a scrollable container
    pub fn scroll(id: ViewId) -> Self {
        let mut style = default_style();
        style.overflow.x = Overflow::Scroll;
        style.overflow.y = Overflow::Scroll;
        Self::with_style(id, style)
    }
}

impl ShadowView for FlexShadowView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn set_property(&mut self, name: &str, value: &Var) -> bool {
        let applied = apply_style_property(&mut self.style, name, value);
        if applied {
            self.dirty = true;
        }
        applied
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn layout(&self) -> Rect {
        self.layout
    }

    fn set_layout(&mut self, bounds: Rect) {
        self.layout = bounds;
        self.dirty = false;
    }
}

/// Layout node of a text view; sized by measuring its text children
#[derive(Debug, Clone)]
pub struct TextShadowView {
    inner: FlexShadowView,
    text_style: TextStyle,
}

impl TextShadowView {
    pub fn new(id: ViewId) -> Self {
        Self {
            inner: FlexShadowView::new(id),
            text_style: TextStyle::default(),
        }
    }
}

impl ShadowView for TextShadowView {
    fn view_id(&self) -> ViewId {
        self.inner.view_id()
    }

    fn style(&self) -> &Style {
        self.inner.style()
    }

    fn set_property(&mut self, name: &str, value: &Var) -> bool {
        if self.text_style.apply_property(name, value) {
            self.inner.mark_dirty();
            return true;
        }
        self.inner.set_property(name, value)
    }

    fn text_style(&self) -> Option<&TextStyle> {
        Some(&self.text_style)
    }

    fn mark_dirty(&mut self) {
        self.inner.mark_dirty();
    }

    fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    fn layout(&self) -> Rect {
        self.inner.layout()
    }

    fn set_layout(&mut self, bounds: Rect) {
        self.inner.set_layout(bounds);
    }
}

/// Content node of a scroll view: grows with its children instead of
/// shrinking to the viewport
#[derive(Debug, Clone)]
pub struct ScrollContentShadowView {
    inner: FlexShadowView,
}

impl ScrollContentShadowView {
    pub fn new(id: ViewId) -> Self {
        let mut style = default_style();
        style.flex_shrink = 0.0;
        style.min_size.height = Dimension::Auto;
        Self {
            inner: FlexShadowView::with_style(id, style),
        }
    }
}

impl ShadowView for ScrollContentShadowView {
    fn view_id(&self) -> ViewId {
        self.inner.view_id()
    }

    fn style(&self) -> &Style {
        self.inner.style()
    }

    fn set_property(&mut self, name: &str, value: &Var) -> bool {
        // Shrinking would clip the scrollable content.
        if name == "flexShrink" || name == "flex" {
            return false;
        }
        self.inner.set_property(name, value)
    }

    fn mark_dirty(&mut self) {
        self.inner.mark_dirty();
    }

    fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    fn layout(&self) -> Rect {
        self.inner.layout()
    }

    fn set_layout(&mut self, bounds: Rect) {
        self.inner.set_layout(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_view::BasicView;

    #[test]
    fn test_known_property_dirties() {
        let mut shadow = FlexShadowView::new(ViewId::try_next().unwrap());
        shadow.set_layout(Rect::default());
        assert!(!shadow.is_dirty());

        assert!(shadow.set_property("width", &Var::from(10)));
        assert!(shadow.is_dirty());
    }

    #[test]
    fn test_unknown_property_is_noop() {
        let mut shadow = FlexShadowView::new(ViewId::try_next().unwrap());
        shadow.set_layout(Rect::default());
        assert!(!shadow.set_property("color", &Var::from("red")));
        assert!(!shadow.is_dirty());
    }

    #[test]
    fn test_text_shadow_measures() {
        let mut shadow = TextShadowView::new(ViewId::try_next().unwrap());
        assert!(shadow.measures_text());
        assert!(shadow.set_property("fontSize", &Var::from(18)));
        assert_eq!(shadow.text_style().map(|s| s.font_size), Some(18.0));
        assert!(!FlexShadowView::new(ViewId::try_next().unwrap()).measures_text());
    }

    #[test]
    fn test_scroll_content_refuses_shrink() {
        let mut shadow = ScrollContentShadowView::new(ViewId::try_next().unwrap());
        assert!(!shadow.set_property("flexShrink", &Var::from(1)));
        assert_eq!(shadow.style().flex_shrink, 0.0);
    }

    #[test]
    fn test_flush_sets_view_bounds() {
        let id = ViewId::try_next().unwrap();
        let mut shadow = FlexShadowView::new(id);
        let mut view = BasicView::new(id);
        shadow.set_layout(Rect::from_xywh(1.0, 2.0, 3.0, 4.0));
        shadow.flush(&mut view);
        assert_eq!(view.bounds(), Rect::from_xywh(1.0, 2.0, 3.0, 4.0));
    }
}
