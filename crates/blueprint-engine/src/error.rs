//! Bridge errors

use blueprint_js::{JsError, MarshalError};
use blueprint_layout::LayoutError;
use blueprint_view::ViewId;

/// Engine error
///
/// Everything except the wrapped script, layout and config errors is a
/// contract violation by the caller.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("unknown view type: {0}")]
    UnknownViewType(String),

    #[error("view type already registered: {0}")]
    DuplicateViewType(String),

    #[error("view type {type_name} produced a malformed view: {reason}")]
    MalformedPair { type_name: String, reason: String },

    #[error("view id space exhausted")]
    IdsExhausted,

    #[error("no view with id {0}")]
    UnknownView(ViewId),

    #[error("view {0} is not a raw text view")]
    NotRawText(ViewId),

    #[error("text view {parent} only accepts raw text children, got {child}")]
    TextChildRequired { parent: ViewId, child: ViewId },

    #[error("raw text view {child} can only be added to a text view, not {parent}")]
    TextOutsideTextView { parent: ViewId, child: ViewId },

    #[error("view {0} cannot have children")]
    LeafView(ViewId),

    #[error("view {0} already has a parent")]
    AlreadyAttached(ViewId),

    #[error("view {0} is still attached")]
    StillAttached(ViewId),

    #[error("the root view cannot be added as a child")]
    RootAsChild,

    #[error("adding {child} to {parent} would create a cycle")]
    CyclicAttach { parent: ViewId, child: ViewId },

    #[error("view {child} is not a child of {parent}")]
    NotAChild { parent: ViewId, child: ViewId },

    #[error("argument {index}: expected {expected}")]
    BadArgument { index: usize, expected: &'static str },

    #[error("view tree is busy")]
    Busy,

    #[error("application root has been destroyed")]
    Destroyed,

    #[error(transparent)]
    Js(#[from] JsError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<rquickjs::Error> for BridgeError {
    fn from(err: rquickjs::Error) -> Self {
        BridgeError::Js(JsError::Runtime(err.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
