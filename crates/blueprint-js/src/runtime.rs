//! JavaScript Runtime

use crate::console::install_console;
use crate::diagnostics::{describe_error, describe_value};
use crate::marshal::{args_to_js, from_js};
use crate::JsError;
use blueprint_view::Var;
use rquickjs::function::Rest;
use rquickjs::{Context, Ctx, Function, Object, Runtime, Value};

/// Upper bound on promise jobs run by a single drain
const MAX_JOBS_PER_DRAIN: usize = 1024;

/// Engine limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Heap limit in bytes, 0 for unlimited
    pub memory_limit: usize,
    /// Native stack limit in bytes, 0 for unlimited
    pub max_stack_size: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            memory_limit: 32 * 1024 * 1024,
            max_stack_size: 1024 * 1024,
        }
    }
}

/// QuickJS runtime and its single context
pub struct JsRuntime {
    runtime: Runtime,
    context: Context,
}

impl JsRuntime {
    /// Create a runtime with the console installed
    pub fn new(options: &RuntimeOptions) -> Result<Self, JsError> {
        let runtime = Runtime::new().map_err(|e| JsError::Runtime(e.to_string()))?;
        if options.memory_limit > 0 {
            runtime.set_memory_limit(options.memory_limit);
        }
        if options.max_stack_size > 0 {
            runtime.set_max_stack_size(options.max_stack_size);
        }

        let context = Context::full(&runtime).map_err(|e| JsError::Runtime(e.to_string()))?;
        context.with(|ctx| install_console(&ctx).map_err(|e| JsError::Runtime(e.to_string())))?;

        tracing::debug!(
            "Created JavaScript runtime (memory limit {}, stack limit {})",
            options.memory_limit,
            options.max_stack_size
        );

        Ok(Self { runtime, context })
    }

    /// Run `f` inside the context
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Ctx<'_>) -> R,
    {
        self.context.with(f)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Evaluate a script, discarding its completion value
    pub fn eval(&self, source: &str) -> Result<(), JsError> {
        self.context.with(|ctx| {
            ctx.eval::<(), _>(source)
                .map_err(|e| JsError::Evaluation(describe_error(&ctx, e)))
        })
    }

    /// Evaluate a script and decode its completion value
    pub fn eval_var(&self, source: &str) -> Result<Var, JsError> {
        self.context.with(|ctx| {
            let value: Value = ctx
                .eval(source)
                .map_err(|e| JsError::Evaluation(describe_error(&ctx, e)))?;
            Ok(from_js(&value)?)
        })
    }

    /// Whether promise jobs are waiting
    pub fn is_job_pending(&self) -> bool {
        self.runtime.is_job_pending()
    }

    /// Drain pending promise jobs. A job that throws is logged and the
    /// drain continues. Returns how many jobs ran.
    pub fn run_pending_jobs(&self) -> usize {
        let mut ran = 0;
        while ran < MAX_JOBS_PER_DRAIN {
            match self.runtime.execute_pending_job() {
                Ok(true) => ran += 1,
                Ok(false) => break,
                Err(err) => {
                    ran += 1;
                    let message = err.0.with(|ctx| describe_value(&ctx.catch()));
                    tracing::warn!("Unhandled error in promise job: {}", message);
                }
            }
        }
        if ran == MAX_JOBS_PER_DRAIN {
            tracing::debug!("Job drain stopped after {} jobs", ran);
        }
        ran
    }
}

impl std::fmt::Debug for JsRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsRuntime").finish_non_exhaustive()
    }
}

/// Call `target[name](...args)` with `target` as the receiver.
///
/// Returns `Ok(None)` when the member is missing or not callable. A throwing
/// call comes back as `JsError::Call` with the described exception.
pub fn call_member<'js>(
    ctx: &Ctx<'js>,
    target: &Object<'js>,
    name: &str,
    args: &[Var],
) -> Result<Option<Var>, JsError> {
    match invoke_member(ctx, target, name, args)? {
        Some(result) => Ok(Some(from_js(&result)?)),
        None => Ok(None),
    }
}

/// Like `call_member`, but the result is dropped without being decoded.
/// Returns whether the member was callable.
pub fn notify_member<'js>(
    ctx: &Ctx<'js>,
    target: &Object<'js>,
    name: &str,
    args: &[Var],
) -> Result<bool, JsError> {
    Ok(invoke_member(ctx, target, name, args)?.is_some())
}

fn invoke_member<'js>(
    ctx: &Ctx<'js>,
    target: &Object<'js>,
    name: &str,
    args: &[Var],
) -> Result<Option<Value<'js>>, JsError> {
    let member: Value = target.get(name).map_err(|e| call_error(ctx, name, e))?;
    let Some(function) = member.as_function().cloned() else {
        return Ok(None);
    };

    let args = args_to_js(ctx, args)?;
    let result = function_call(&function, target, args).map_err(|e| call_error(ctx, name, e))?;
    Ok(Some(result))
}

fn function_call<'js>(
    function: &Function<'js>,
    this: &Object<'js>,
    args: Vec<Value<'js>>,
) -> rquickjs::Result<Value<'js>> {
    function.call((rquickjs::function::This(this.clone()), Rest(args)))
}

fn call_error(ctx: &Ctx<'_>, name: &str, err: rquickjs::Error) -> JsError {
    JsError::Call {
        function: name.to_string(),
        message: describe_error(ctx, err),
    }
}
