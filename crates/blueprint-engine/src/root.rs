//! Application Root
//!
//! Owns the script runtime, the view tree and the scheduler of one UI.
//!
//! Lifecycle: `new` brings the root up Ready with the scheduler inert;
//! a successful `evaluate` starts the scheduler; `reset` swaps in a fresh
//! runtime and an empty tree; `destroy` (or drop) is terminal.

use crate::bridge::{install_method, install_native_interface, MethodTable, NativeMethod, SharedTree};
use crate::builtins::install_builtin_view_types;
use crate::config::RootConfig;
use crate::error::{BridgeError, Result};
use crate::events;
use crate::mutator::ViewTree;
use crate::registry::{ViewFactory, ViewPair};
use crate::scheduler::Scheduler;
use blueprint_js::JsRuntime;
use blueprint_view::{Var, ViewId};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState {
    Ready,
    Destroyed,
}

/// Application root
pub struct ApplicationRoot {
    config: RootConfig,
    tree: SharedTree,
    methods: Rc<RefCell<MethodTable>>,
    js: Option<JsRuntime>,
    scheduler: Scheduler,
}

impl ApplicationRoot {
    /// Create a root with the built-in view types installed
    pub fn new(config: RootConfig) -> Result<Self> {
        let mut tree = ViewTree::new(config.width, config.height);
        install_builtin_view_types(tree.registry_mut())?;

        let tree = Rc::new(RefCell::new(tree));
        let methods = Rc::new(RefCell::new(MethodTable::new()));
        let js = create_runtime(&config, &tree, &methods)?;
        let scheduler = Scheduler::new(config.scheduler_interval());

        tracing::info!(
            "Application root ready ({}x{}, {:?} tick)",
            config.width,
            config.height,
            scheduler.interval()
        );

        Ok(Self {
            config,
            tree,
            methods,
            js: Some(js),
            scheduler,
        })
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    pub fn state(&self) -> RootState {
        if self.js.is_some() {
            RootState::Ready
        } else {
            RootState::Destroyed
        }
    }

    fn runtime(&self) -> Result<&JsRuntime> {
        self.js.as_ref().ok_or(BridgeError::Destroyed)
    }

    // ========================================================================
    // Script
    // ========================================================================

    /// Evaluate a script bundle. The first success starts the scheduler; a
    /// failure is logged and leaves the scheduler as it was.
    pub fn evaluate(&mut self, source: &str) -> Result<()> {
        let js = self.runtime()?;
        if let Err(e) = js.eval(source) {
            tracing::error!("{}", e);
            return Err(e.into());
        }
        js.run_pending_jobs();

        if !self.scheduler.is_running() {
            self.scheduler.start(Instant::now());
        }
        tracing::info!("Evaluated script ({} bytes)", source.len());
        Ok(())
    }

    /// Evaluate an expression and return its value
    pub fn evaluate_expression(&self, source: &str) -> Result<Var> {
        Ok(self.runtime()?.eval_var(source)?)
    }

    /// Run one scheduler tick now, if the scheduler is running. Returns
    /// whether a tick ran.
    pub fn tick(&mut self) -> Result<bool> {
        let js = self.runtime()?;
        if !self.scheduler.is_running() {
            return Ok(false);
        }
        run_tick(js);
        Ok(true)
    }

    /// Advance the scheduler clock to `now`, ticking if one is due
    pub fn pump(&mut self, now: Instant) -> Result<bool> {
        let js = self.js.as_ref().ok_or(BridgeError::Destroyed)?;
        if !self.scheduler.poll(now) {
            return Ok(false);
        }
        run_tick(js);
        Ok(true)
    }

    /// How long an event loop may sleep before the next `pump`
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        if self.js.is_none() {
            return None;
        }
        self.scheduler.time_until_next(now)
    }

    pub fn is_scheduler_running(&self) -> bool {
        self.scheduler.is_running()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Deliver a view-scoped event to script
    pub fn dispatch_view_event(&self, id: ViewId, event_type: &str, args: &[Var]) -> Result<()> {
        events::dispatch_view_event(self.runtime()?, id, event_type, args);
        Ok(())
    }

    /// Deliver a global event to script
    pub fn dispatch_event(&self, event_type: &str, args: &[Var]) -> Result<()> {
        events::dispatch_event(self.runtime()?, event_type, args);
        Ok(())
    }

    // ========================================================================
    // Extension
    // ========================================================================

    /// Register a view type for `createViewInstance`
    pub fn register_view_type(
        &mut self,
        name: &str,
        factory: impl Fn(ViewId) -> ViewPair + 'static,
    ) -> Result<()> {
        self.runtime()?;
        let factory: ViewFactory = Rc::new(factory);
        self.tree_mut()?.register_view_type(name, factory)
    }

    /// Expose a native closure to script as `__BlueprintNative__[name]`.
    /// The closure survives resets.
    pub fn register_native_method(
        &mut self,
        name: &str,
        method: impl Fn(&[Var]) + 'static,
    ) -> Result<()> {
        let js = self.runtime()?;
        let method: NativeMethod = Rc::new(method);
        let index = self.methods.borrow_mut().register(name, method);
        js.with(|ctx| install_method(&ctx, &self.methods, index))?;
        tracing::debug!("Registered native method {} (#{})", name, index);
        Ok(())
    }

    // ========================================================================
    // Tree
    // ========================================================================

    /// Resize the viewport
    pub fn set_bounds(&mut self, width: f32, height: f32) -> Result<()> {
        self.runtime()?;
        self.config.width = width;
        self.config.height = height;
        self.tree_mut()?.set_viewport(width, height);
        Ok(())
    }

    pub fn tree(&self) -> Result<Ref<'_, ViewTree>> {
        self.tree.try_borrow().map_err(|_| BridgeError::Busy)
    }

    pub fn tree_mut(&self) -> Result<RefMut<'_, ViewTree>> {
        self.tree.try_borrow_mut().map_err(|_| BridgeError::Busy)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Throw away the runtime and every view, then start over with a fresh
    /// runtime. A bundle must be evaluated again to restart the scheduler.
    pub fn reset(&mut self) -> Result<()> {
        self.runtime()?;
        let mut tree = self.tree.try_borrow_mut().map_err(|_| BridgeError::Busy)?;
        tracing::info!("Resetting application root");

        self.scheduler.stop();
        self.js = None;
        tree.clear();
        drop(tree);

        match create_runtime(&self.config, &self.tree, &self.methods) {
            Ok(js) => {
                self.js = Some(js);
                tracing::info!("Application root ready after reset");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Reset failed, root destroyed: {}", e);
                Err(e)
            }
        }
    }

    /// Stop the scheduler and drop the runtime. Terminal.
    pub fn destroy(&mut self) {
        self.scheduler.stop();
        if self.js.take().is_some() {
            tracing::info!("Application root destroyed");
        }
    }
}

impl Drop for ApplicationRoot {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for ApplicationRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationRoot")
            .field("state", &self.state())
            .field("scheduler", &self.scheduler)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

fn create_runtime(
    config: &RootConfig,
    tree: &SharedTree,
    methods: &Rc<RefCell<MethodTable>>,
) -> Result<JsRuntime> {
    let js = JsRuntime::new(&config.runtime_options())?;
    js.with(|ctx| install_native_interface(&ctx, tree, methods))?;
    Ok(js)
}

fn run_tick(js: &JsRuntime) {
    events::scheduler_interrupt(js);
    let jobs = js.run_pending_jobs();
    if jobs > 0 {
        tracing::trace!("Tick ran {} jobs", jobs);
    }
}
