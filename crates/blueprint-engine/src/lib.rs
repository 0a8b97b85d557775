//! Blueprint Engine
//!
//! Keeps a native view tree in step with a script that describes the UI.
//!
//! # Architecture
//!
//! ```text
//! script ──► __BlueprintNative__ entry points ──► ViewTree ──► layout pass
//!   ▲                                                              │
//!   └──── dispatchViewEvent / dispatchEvent / scheduler tick ◄─────┘
//! ```
//!
//! Every view is a pair of a render node (`blueprint_view::View`) and an
//! optional layout node (`blueprint_layout::ShadowView`) stored in one
//! registry under a `ViewId`. Raw text leaves have no layout node; the text
//! view above them measures their payload.
//!
//! Everything here is single-threaded: the root, its runtime and its tree
//! are `!Send` and must stay on the UI thread.
//!
//! # Example
//!
//! ```no_run
//! use blueprint_engine::{ApplicationRoot, RootConfig};
//!
//! let mut root = ApplicationRoot::new(RootConfig::default().with_size(320.0, 480.0)).unwrap();
//! root.evaluate("var N = __BlueprintNative__; N.addChild(N.getRootInstanceId(), N.createViewInstance('View'));").unwrap();
//! ```

mod bridge;
mod builtins;
mod config;
mod error;
mod events;
mod layout;
mod mutator;
mod registry;
mod root;
mod scheduler;

pub use bridge::{MethodTable, NativeMethod, NATIVE_NAMESPACE};
pub use builtins::{builtin_view_types, factory};
pub use config::RootConfig;
pub use error::{BridgeError, Result};
pub use events::{DISPATCH_EVENT, DISPATCH_VIEW_EVENT, SCHEDULER_INTERRUPT};
pub use mutator::ViewTree;
pub use registry::{ViewFactory, ViewPair, ViewRegistry, ViewSlot};
pub use root::{ApplicationRoot, RootState};
pub use scheduler::Scheduler;

// Re-export component crates
pub use blueprint_js as js;
pub use blueprint_layout as shadow;
pub use blueprint_view as view;
