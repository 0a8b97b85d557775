//! Event Dispatcher
//!
//! Native to script calls: view events, global events and the scheduler
//! interrupt. Failures are logged and swallowed; the native caller never
//! sees them.

use crate::bridge::NATIVE_NAMESPACE;
use blueprint_js::{notify_member, JsError, JsRuntime};
use blueprint_view::{Var, ViewId};
use rquickjs::Object;

/// Script function receiving per-view events
pub const DISPATCH_VIEW_EVENT: &str = "dispatchViewEvent";

/// Script function receiving global events
pub const DISPATCH_EVENT: &str = "dispatchEvent";

/// Global zero-argument function run on every scheduler tick
pub const SCHEDULER_INTERRUPT: &str = "__schedulerInterrupt__";

#[derive(Debug, Clone, Copy)]
enum Receiver {
    Namespace,
    Global,
}

/// Call `dispatchViewEvent(id, event_type, ...args)`
pub fn dispatch_view_event(js: &JsRuntime, id: ViewId, event_type: &str, args: &[Var]) {
    let mut call_args = Vec::with_capacity(args.len() + 2);
    call_args.push(Var::from(id.get()));
    call_args.push(Var::from(event_type));
    call_args.extend_from_slice(args);

    tracing::trace!("Dispatching {} to {}", event_type, id);
    invoke(js, Receiver::Namespace, DISPATCH_VIEW_EVENT, &call_args);
}

/// Call `dispatchEvent(event_type, ...args)`
pub fn dispatch_event(js: &JsRuntime, event_type: &str, args: &[Var]) {
    let mut call_args = Vec::with_capacity(args.len() + 1);
    call_args.push(Var::from(event_type));
    call_args.extend_from_slice(args);

    tracing::trace!("Dispatching global {}", event_type);
    invoke(js, Receiver::Namespace, DISPATCH_EVENT, &call_args);
}

/// Run the script's scheduler interrupt
pub fn scheduler_interrupt(js: &JsRuntime) {
    invoke(js, Receiver::Global, SCHEDULER_INTERRUPT, &[]);
}

fn invoke(js: &JsRuntime, receiver: Receiver, function: &str, args: &[Var]) {
    js.with(|ctx| {
        let target: Option<Object> = match receiver {
            Receiver::Namespace => ctx.globals().get(NATIVE_NAMESPACE).ok().flatten(),
            Receiver::Global => Some(ctx.globals()),
        };
        let Some(target) = target else {
            tracing::trace!("Skipped {}: {} is not defined", function, NATIVE_NAMESPACE);
            return;
        };

        // Fire and forget: whatever the handler returns is never read
        match notify_member(&ctx, &target, function, args) {
            Ok(true) => {}
            Ok(false) => tracing::trace!("Skipped {}: not defined", function),
            Err(e @ JsError::Call { .. }) => tracing::warn!("{}", e),
            Err(e) => tracing::warn!("Calling {} failed: {}", function, e),
        }
    });
}
