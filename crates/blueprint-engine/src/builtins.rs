//! Built-in view types

use crate::error::Result;
use crate::registry::{ViewFactory, ViewPair, ViewRegistry};
use blueprint_layout::{FlexShadowView, ScrollContentShadowView, TextShadowView};
use blueprint_view::{BasicView, ImageView, ScrollView, TextView, ViewId};
use std::rc::Rc;

/// Type names and factories installed in every application root
pub fn builtin_view_types() -> Vec<(&'static str, ViewFactory)> {
    vec![
        ("View", factory(|id| ViewPair::new(BasicView::new(id), FlexShadowView::new(id)))),
        ("Text", factory(|id| ViewPair::new(TextView::new(id), TextShadowView::new(id)))),
        ("Image", factory(|id| ViewPair::new(ImageView::new(id), FlexShadowView::new(id)))),
        (
            "ScrollView",
            factory(|id| ViewPair::new(ScrollView::new(id), FlexShadowView::scroll(id))),
        ),
        (
            "ScrollViewContentView",
            factory(|id| ViewPair::new(BasicView::new(id), ScrollContentShadowView::new(id))),
        ),
    ]
}

/// Wrap a constructor closure as a factory
pub fn factory(f: impl Fn(ViewId) -> ViewPair + 'static) -> ViewFactory {
    Rc::new(f)
}

pub fn install_builtin_view_types(registry: &mut ViewRegistry) -> Result<()> {
    for (name, factory) in builtin_view_types() {
        registry.register_view_type(name, factory)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_view::{Capabilities, ViewKind};

    #[test]
    fn test_all_builtins_create() {
        let mut registry = ViewRegistry::new();
        install_builtin_view_types(&mut registry).unwrap();

        for (name, _) in builtin_view_types() {
            let id = registry.create(name).unwrap();
            let (_, shadow) = registry.lookup(id).unwrap();
            assert!(shadow.is_some(), "{} has no layout node", name);
        }
    }

    #[test]
    fn test_text_measures() {
        let mut registry = ViewRegistry::new();
        install_builtin_view_types(&mut registry).unwrap();

        let id = registry.create("Text").unwrap();
        let (view, shadow) = registry.lookup(id).unwrap();
        assert_eq!(view.kind(), ViewKind::Text);
        assert!(view.capabilities().contains(Capabilities::MEASURES_TEXT));
        assert!(shadow.is_some_and(|s| s.measures_text()));
    }
}
