//! Exception diagnostics
//!
//! Turns a thrown script value into the best log line available: name,
//! message and stack for error objects, string coercion for anything else.

use rquickjs::convert::Coerced;
use rquickjs::{Ctx, Value};

/// Describe a failed engine call. For thrown exceptions this takes the
/// pending exception off the context.
pub fn describe_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> String {
    match err {
        rquickjs::Error::Exception => describe_value(&ctx.catch()),
        other => other.to_string(),
    }
}

/// Describe a thrown value
pub fn describe_value(value: &Value<'_>) -> String {
    if let Some(object) = value.as_object() {
        let name: Option<String> = object.get("name").ok().flatten();
        let message: Option<String> = object.get("message").ok().flatten();
        let stack: Option<String> = object.get("stack").ok().flatten();

        if message.is_some() || stack.is_some() {
            let mut out = match (name, message) {
                (Some(name), Some(message)) => format!("{}: {}", name, message),
                (None, Some(message)) => message,
                (Some(name), None) => name,
                (None, None) => String::new(),
            };
            if let Some(stack) = stack.filter(|s| !s.trim().is_empty()) {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(stack.trim_end());
            }
            return out;
        }
    }

    value
        .get::<Coerced<String>>()
        .map(|c| c.0)
        .unwrap_or_else(|_| "<unprintable exception>".to_string())
}
