//! Shared helpers for engine integration tests

#![allow(dead_code)]

use blueprint_engine::shadow::{ShadowView, TextShadowView, TextStyle};
use blueprint_engine::view::{Rect, TextView, Var, View, ViewId};
use blueprint_engine::{ApplicationRoot, RootConfig, ViewPair};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use taffy::Style;
use tracing_subscriber::fmt::writer::MakeWriter;

// ============================================================================
// Log capture
// ============================================================================

/// In-memory sink for a scoped fmt subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Run `f` with every event up to TRACE written into this buffer
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Captured lines at `level` ("WARN", "ERROR", ...)
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ============================================================================
// Probe view type
// ============================================================================

/// Text layout node that counts how often it is marked dirty
#[derive(Debug)]
pub struct ProbeTextShadow {
    inner: TextShadowView,
    dirtied: Rc<Cell<u32>>,
}

impl ShadowView for ProbeTextShadow {
    fn view_id(&self) -> ViewId {
        self.inner.view_id()
    }

    fn style(&self) -> &Style {
        self.inner.style()
    }

    fn set_property(&mut self, name: &str, value: &Var) -> bool {
        self.inner.set_property(name, value)
    }

    fn text_style(&self) -> Option<&TextStyle> {
        self.inner.text_style()
    }

    fn mark_dirty(&mut self) {
        self.dirtied.set(self.dirtied.get() + 1);
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

/// Register "ProbeText" on `root`; the counter is shared by every instance
pub fn register_probe_text(root: &mut ApplicationRoot) -> Rc<Cell<u32>> {
    let dirtied = Rc::new(Cell::new(0));
    let counter = dirtied.clone();
    root.register_view_type("ProbeText", move |id| ViewPair {
        view: Box::new(TextView::new(id)),
        shadow: Some(Box::new(ProbeTextShadow {
            inner: TextShadowView::new(id),
            dirtied: counter.clone(),
        })),
    })
    .unwrap();
    dirtied
}

// ============================================================================
// Helpers
// ============================================================================

pub fn root() -> ApplicationRoot {
    ApplicationRoot::new(RootConfig::default().with_size(200.0, 100.0)).unwrap()
}

pub fn handle(var: &Var) -> ViewId {
    ViewId(var.as_f64().expect("handle is a number") as u32)
}

/// Evaluate `expr` and read it back as a list of handles
pub fn handles(root: &ApplicationRoot, expr: &str) -> Vec<ViewId> {
    let var = root.evaluate_expression(expr).unwrap();
    var.as_array().unwrap().iter().map(handle).collect()
}

pub fn paint_requests(root: &ApplicationRoot, id: ViewId) -> u64 {
    root.tree().unwrap().registry().lookup(id).unwrap().0.paint_requests()
}
