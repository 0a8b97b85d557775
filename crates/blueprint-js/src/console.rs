//! Console API
//!
//! Implements console.log, console.info, console.warn, console.error and
//! console.debug on top of tracing.

use crate::marshal::from_js;
use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Value};

#[derive(Debug, Clone, Copy)]
enum Level {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

const LEVELS: [(&str, Level); 5] = [
    ("log", Level::Log),
    ("info", Level::Info),
    ("warn", Level::Warn),
    ("error", Level::Error),
    ("debug", Level::Debug),
];

/// Install the console API into the global object
pub fn install_console(ctx: &Ctx<'_>) -> Result<(), rquickjs::Error> {
    let console = Object::new(ctx.clone())?;

    for (name, level) in LEVELS {
        let log = Function::new(ctx.clone(), move |args: Rest<Value>| {
            emit(level, &format_args_line(&args.0));
        })?;
        console.set(name, log)?;
    }

    ctx.globals().set("console", console)?;
    Ok(())
}

fn emit(level: Level, line: &str) {
    match level {
        Level::Error => tracing::error!("[JS] {}", line),
        Level::Warn => tracing::warn!("[JS] {}", line),
        Level::Debug => tracing::debug!("[JS] {}", line),
        Level::Log | Level::Info => tracing::info!("[JS] {}", line),
    }
}

/// Join console arguments with single spaces
fn format_args_line(values: &[Value<'_>]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match from_js(value) {
            Ok(var) => out.push_str(&var.to_string()),
            Err(_) if value.is_symbol() => out.push_str("[Symbol]"),
            Err(_) => out.push_str("[unknown]"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::{Context, Runtime};

    #[test]
    fn test_console_levels() {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();

        context.with(|ctx| {
            install_console(&ctx).unwrap();
            let _: Value = ctx
                .eval("console.log('a'); console.info('b'); console.warn('c'); console.error('d'); console.debug('e')")
                .unwrap();
        });
    }

    #[test]
    fn test_format_args() {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();

        context.with(|ctx| {
            let values: Vec<Value> = ctx.eval("['Hello', 42, true, null, [1, 2]]").unwrap();
            assert_eq!(format_args_line(&values), "Hello 42 true null [1, 2]");
        });
    }
}
