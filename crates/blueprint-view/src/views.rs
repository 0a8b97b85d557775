//! Built-in render nodes
//!
//! Painting belongs to the host; these nodes only hold the state a painter
//! would read.

use crate::{Var, View, ViewBase, ViewId, ViewKind};

/// Generic container
#[derive(Debug, Clone)]
pub struct BasicView {
    base: ViewBase,
}

impl BasicView {
    pub fn new(id: ViewId) -> Self {
        Self { base: ViewBase::new(id) }
    }
}

impl View for BasicView {
    fn kind(&self) -> ViewKind {
        ViewKind::View
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }
}

/// Text container; paints the payload of its raw text children
#[derive(Debug, Clone)]
pub struct TextView {
    base: ViewBase,
}

impl TextView {
    pub fn new(id: ViewId) -> Self {
        Self { base: ViewBase::new(id) }
    }
}

impl View for TextView {
    fn kind(&self) -> ViewKind {
        ViewKind::Text
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }
}

/// Text leaf holding only a string payload
#[derive(Debug, Clone)]
pub struct RawTextView {
    base: ViewBase,
    text: String,
}

impl RawTextView {
    pub fn new(id: ViewId, text: impl Into<String>) -> Self {
        Self {
            base: ViewBase::new(id),
            text: text.into(),
        }
    }
}

impl View for RawTextView {
    fn kind(&self) -> ViewKind {
        ViewKind::RawText
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_text(&mut self, text: &str) -> bool {
        self.text.clear();
        self.text.push_str(text);
        true
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    // The parent text view paints for us.
    fn repaint(&mut self) {}
}

/// Image leaf
#[derive(Debug, Clone)]
pub struct ImageView {
    base: ViewBase,
    source: Option<String>,
}

impl ImageView {
    pub fn new(id: ViewId) -> Self {
        Self {
            base: ViewBase::new(id),
            source: None,
        }
    }

    /// Current image source, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl View for ImageView {
    fn kind(&self) -> ViewKind {
        ViewKind::Image
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_property(&mut self, name: &str, value: &Var) {
        if name == "source" {
            self.source = value.as_str().map(str::to_string);
        }
        if value.is_undefined() {
            self.base.props_mut().shift_remove(name);
        } else {
            self.base.props_mut().insert(name.to_string(), value.clone());
        }
    }
}

/// Scrollable container
#[derive(Debug, Clone)]
pub struct ScrollView {
    base: ViewBase,
    scroll_x: f32,
    scroll_y: f32,
}

impl ScrollView {
    pub fn new(id: ViewId) -> Self {
        Self {
            base: ViewBase::new(id),
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Current scroll offset
    pub fn scroll_offset(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.scroll_x = x.max(0.0);
        self.scroll_y = y.max(0.0);
        self.repaint();
    }
}

impl View for ScrollView {
    fn kind(&self) -> ViewKind {
        ViewKind::ScrollView
    }

    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }
}
