//! Native Call Bridge
//!
//! Script-callable entry points on the `__BlueprintNative__` namespace and
//! the method table behind registered native closures.
//!
//! Entry points are closures bound to the tree they mutate when they are
//! installed, so several application roots can live side by side. Contract
//! violations are thrown back into script as `TypeError`s.

use crate::error::{BridgeError, Result};
use crate::mutator::ViewTree;
use blueprint_js::{args_from_js, to_js};
use blueprint_view::{Var, ViewId};
use rquickjs::function::Rest;
use rquickjs::{Ctx, Exception, Function, Object, Value};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// Global object holding native entry points and registered methods
pub const NATIVE_NAMESPACE: &str = "__BlueprintNative__";

/// View tree shared between the root and its entry points
pub type SharedTree = Rc<RefCell<ViewTree>>;

/// Native closure callable from script. Arguments arrive marshaled; nothing
/// is returned to script.
pub type NativeMethod = Rc<dyn Fn(&[Var])>;

type EntryPoint = fn(&SharedTree, &[Var]) -> Result<Var>;

const ENTRY_POINTS: [(&str, EntryPoint); 7] = [
    ("createViewInstance", create_view_instance),
    ("createTextViewInstance", create_text_view_instance),
    ("setViewProperty", set_view_property),
    ("setRawTextValue", set_raw_text_value),
    ("addChild", add_child),
    ("removeChild", remove_child),
    ("getRootInstanceId", get_root_instance_id),
];

/// Registered native closures, addressed by registration index
#[derive(Default)]
pub struct MethodTable {
    methods: Vec<(String, NativeMethod)>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a method; returns its index
    pub fn register(&mut self, name: &str, method: NativeMethod) -> usize {
        self.methods.push((name.to_string(), method));
        self.methods.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<NativeMethod> {
        self.methods.get(index).map(|(_, method)| method.clone())
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.methods.get(index).map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.methods.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Install the entry points and every registered method into a fresh
/// context
pub fn install_native_interface<'js>(
    ctx: &Ctx<'js>,
    tree: &SharedTree,
    methods: &Rc<RefCell<MethodTable>>,
) -> rquickjs::Result<()> {
    let namespace = native_namespace(ctx)?;

    for (name, entry) in ENTRY_POINTS {
        let tree = tree.clone();
        let function = Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
                let result = args_from_js(&args.0)
                    .map_err(BridgeError::from)
                    .and_then(|vars| entry(&tree, &vars))
                    .and_then(|var| to_js(&ctx, &var).map_err(BridgeError::from));
                result.map_err(|e| throw(&ctx, name, e))
            },
        )?;
        namespace.set(name, function)?;
    }

    let count = methods.borrow().len();
    for index in 0..count {
        install_method(ctx, methods, index)?;
    }

    tracing::debug!("Installed native interface ({} methods)", count);
    Ok(())
}

/// Expose method `index` of the table to script under its registered name.
///
/// The installed function is a trampoline: it captures only the table and
/// the index, and looks the closure up at call time.
pub fn install_method<'js>(
    ctx: &Ctx<'js>,
    methods: &Rc<RefCell<MethodTable>>,
    index: usize,
) -> rquickjs::Result<()> {
    let Some(name) = methods.borrow().name(index).map(str::to_string) else {
        return Ok(());
    };

    let table = methods.clone();
    let method_name = name.clone();
    let trampoline = Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<()> {
            let vars = args_from_js(&args.0)
                .map_err(|e| throw(&ctx, &method_name, BridgeError::from(e)))?;

            // Release the table before calling out; the method may register more
            let method = table.borrow().get(index);
            match method {
                Some(method) => method(&vars),
                None => tracing::warn!("Native method {} (#{}) is gone", method_name, index),
            }
            Ok(())
        },
    )?;

    native_namespace(ctx)?.set(name.as_str(), trampoline)
}

/// The namespace object, created on first use
fn native_namespace<'js>(ctx: &Ctx<'js>) -> rquickjs::Result<Object<'js>> {
    let globals = ctx.globals();
    if let Ok(Some(namespace)) = globals.get::<_, Option<Object>>(NATIVE_NAMESPACE) {
        return Ok(namespace);
    }
    let namespace = Object::new(ctx.clone())?;
    globals.set(NATIVE_NAMESPACE, namespace.clone())?;
    Ok(namespace)
}

fn throw(ctx: &Ctx<'_>, function: &str, err: BridgeError) -> rquickjs::Error {
    tracing::debug!("{} rejected: {}", function, err);
    Exception::throw_type(ctx, &format!("{}: {}", function, err))
}

fn borrow_tree(tree: &SharedTree) -> Result<RefMut<'_, ViewTree>> {
    tree.try_borrow_mut().map_err(|_| BridgeError::Busy)
}

// ============================================================================
// Entry points
// ============================================================================

fn create_view_instance(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let type_name = str_arg(args, 0, "a view type name")?;
    let id = borrow_tree(tree)?.create_view(type_name)?;
    Ok(handle_var(id))
}

fn create_text_view_instance(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let text = text_arg(args, 0)?;
    let id = borrow_tree(tree)?.create_text(&text)?;
    Ok(handle_var(id))
}

fn set_view_property(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let id = handle_arg(args, 0)?;
    let name = str_arg(args, 1, "a property name")?;
    let undefined = Var::Undefined;
    let value = args.get(2).unwrap_or(&undefined);
    borrow_tree(tree)?.set_property(id, name, value)?;
    Ok(Var::Undefined)
}

fn set_raw_text_value(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let id = handle_arg(args, 0)?;
    let text = text_arg(args, 1)?;
    borrow_tree(tree)?.set_text(id, &text)?;
    Ok(Var::Undefined)
}

fn add_child(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let parent = handle_arg(args, 0)?;
    let child = handle_arg(args, 1)?;
    let index = index_arg(args, 2);
    borrow_tree(tree)?.add_child(parent, child, index)?;
    Ok(Var::Undefined)
}

fn remove_child(tree: &SharedTree, args: &[Var]) -> Result<Var> {
    let parent = handle_arg(args, 0)?;
    let child = handle_arg(args, 1)?;
    borrow_tree(tree)?.remove_child(parent, child)?;
    Ok(Var::Undefined)
}

fn get_root_instance_id(_tree: &SharedTree, _args: &[Var]) -> Result<Var> {
    Ok(handle_var(ViewId::ROOT))
}

// ============================================================================
// Argument decoding
// ============================================================================

fn handle_var(id: ViewId) -> Var {
    Var::from(id.get())
}

fn handle_arg(args: &[Var], index: usize) -> Result<ViewId> {
    match args.get(index).and_then(Var::as_f64) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(ViewId(n as u32)),
        _ => Err(BridgeError::BadArgument {
            index,
            expected: "a view id",
        }),
    }
}

fn str_arg<'a>(args: &'a [Var], index: usize, expected: &'static str) -> Result<&'a str> {
    args.get(index)
        .and_then(Var::as_str)
        .ok_or(BridgeError::BadArgument { index, expected })
}

/// Text payloads may arrive as strings or numbers
fn text_arg(args: &[Var], index: usize) -> Result<String> {
    match args.get(index) {
        Some(Var::String(s)) => Ok(s.clone()),
        Some(n @ Var::Number(_)) => Ok(n.to_string()),
        _ => Err(BridgeError::BadArgument {
            index,
            expected: "a string",
        }),
    }
}

/// Insertion index; anything but a non-negative number means append
fn index_arg(args: &[Var], index: usize) -> Option<usize> {
    args.get(index)
        .and_then(Var::as_f64)
        .filter(|n| *n >= 0.0)
        .map(|n| n as usize)
}
