//! Blueprint JavaScript Runtime
//!
//! QuickJS-based script side of the bridge.
//!
//! Features:
//! - QuickJS runtime via rquickjs, with memory and stack limits
//! - Console API (log, info, warn, error, debug) routed to tracing
//! - Value marshaling between script values and `Var`
//! - Exception diagnostics (name, message, stack)
//! - Promise job draining

mod console;
mod diagnostics;
pub mod marshal;
mod runtime;

pub use console::install_console;
pub use diagnostics::{describe_error, describe_value};
pub use marshal::{args_from_js, args_to_js, from_js, to_js, MAX_DEPTH};
pub use runtime::{call_member, notify_member, JsRuntime, RuntimeOptions};

/// Value marshaling error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarshalError {
    #[error("unsupported script value: {0}")]
    Unsupported(String),

    #[error("value nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("engine error while marshaling: {0}")]
    Engine(String),
}

impl From<rquickjs::Error> for MarshalError {
    fn from(err: rquickjs::Error) -> Self {
        MarshalError::Engine(err.to_string())
    }
}

/// JavaScript error
#[derive(Debug, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript runtime error: {0}")]
    Runtime(String),

    #[error("Script error: {0}")]
    Evaluation(String),

    #[error("Script function {function} failed: {message}")]
    Call { function: String, message: String },

    #[error(transparent)]
    Marshal(#[from] MarshalError),
}
