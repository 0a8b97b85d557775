//! Blueprint Views
//!
//! Native side of the script bridge:
//! - `ViewId` handles shared by the render and layout trees
//! - `Var`, the native dynamic value exchanged with script
//! - The `View` capability set and the built-in render nodes

mod geometry;
mod var;
mod view;
mod views;

pub use geometry::Rect;
pub use var::{Properties, Var};
pub use view::{Capabilities, View, ViewBase, ViewKind};
pub use views::{BasicView, ImageView, RawTextView, ScrollView, TextView};

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// First id handed out by `ViewId::try_next`; everything below is reserved.
const FIRST_DYNAMIC_ID: u32 = 2;

static NEXT_VIEW_ID: AtomicU32 = AtomicU32::new(FIRST_DYNAMIC_ID);

/// View identifier (opaque integer handle shared with script)
///
/// Ids are process-unique and never reused, so a handle that outlived its
/// node can only ever fail a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u32);

impl ViewId {
    /// Reserved id of every application root
    pub const ROOT: ViewId = ViewId(1);

    /// Allocate a fresh id, `None` once the id space is exhausted
    pub fn try_next() -> Option<Self> {
        allocate(&NEXT_VIEW_ID)
    }

    /// Numeric value as seen by script
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Take the next id from `counter`. The counter never wraps, so an id can
/// not come round a second time.
fn allocate(counter: &AtomicU32) -> Option<ViewId> {
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
        .ok()
        .map(ViewId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<ViewId> = (0..1000).map(|_| ViewId::try_next().unwrap()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(!ids.contains(&ViewId::ROOT));
    }

    #[test]
    fn test_ids_increase() {
        let a = ViewId::try_next().unwrap();
        let b = ViewId::try_next().unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_exhausted_counter_stops() {
        let counter = AtomicU32::new(u32::MAX - 1);
        assert_eq!(allocate(&counter), Some(ViewId(u32::MAX - 1)));
        assert_eq!(allocate(&counter), None);
        assert_eq!(allocate(&counter), None);
        assert_eq!(counter.load(Ordering::Relaxed), u32::MAX);
    }
}
