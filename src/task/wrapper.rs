//! The argument-adapting wrapper around task callables.
//!
//! Slots are resolved once at registration time from the descriptor and the
//! options; values are materialized per invocation (the completion handle
//! must be fresh each run).

use rhai::{Dynamic, Engine, Map};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

use super::registry::RegisteredTask;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::logger::{debug, trace, warn};
use crate::printer;

/// A resolved argument position in a task's call list.
#[derive(Debug, Clone)]
pub enum ArgSlot {
    /// Runner context map (task name, task root, separator).
    Context,
    /// Completion handle the script may signal explicitly.
    Done,
    /// The merged settings object.
    Settings,
    /// Constant value from the mapper table or the deprecated `arguments`
    /// option.
    Fixed(Dynamic),
}

/// Completion handle passed to task scripts. Return from the callable already
/// counts as completion; signalling is for scripts that want to mark it
/// explicitly before doing cleanup work.
#[derive(Debug, Clone, Default)]
pub struct Done {
    signalled: Arc<AtomicBool>,
}

impl Done {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.signalled.store(true, Ordering::Relaxed);
    }

    pub fn is_signalled(&self) -> bool {
        self.signalled.load(Ordering::Relaxed)
    }
}

/// Register the `Done` type so scripts can call `done.signal()`.
pub(crate) fn register_done_type(engine: &mut Engine) {
    engine
        .register_type_with_name::<Done>("Done")
        .register_fn("signal", |done: &mut Done| done.signal());
}

/// Resolve the argument slots for a descriptor according to the options.
pub fn assemble_slots(
    descriptor: &super::TaskDescriptor,
    options: &Options,
) -> Result<Vec<ArgSlot>> {
    if let Some(fixed) = &options.arguments {
        warn_deprecated_arguments();
        return fixed
            .iter()
            .map(|value| Ok(ArgSlot::Fixed(rhai::serde::to_dynamic(value)?)))
            .collect();
    }

    let injected = descriptor.inject.is_some() || options.dynamic_inclusion;
    if injected {
        let capabilities = descriptor.inject.as_deref().unwrap_or(&[]);
        return capabilities
            .iter()
            .map(|capability| resolve_capability(capability, options))
            .collect();
    }

    let mut slots = Vec::new();
    if options.pass_context {
        slots.push(ArgSlot::Context);
    }
    if options.pass_callback {
        slots.push(ArgSlot::Done);
    }
    if options.load_settings {
        slots.push(ArgSlot::Settings);
    }
    Ok(slots)
}

/// Warn about the deprecated `arguments` option once per process, not once
/// per registered task.
fn warn_deprecated_arguments() {
    static WARNED: Once = Once::new();
    WARNED.call_once(|| {
        let message = "The 'arguments' option is deprecated and will be removed \
                       in the next major version. Use a mapper entry or module \
                       state instead.";
        warn!("{}", message);
        printer::warn(message);
    });
}

/// Map a capability name to a provider: the options mapper wins, then the
/// built-ins. Unknown names fail registration instead of silently injecting
/// nothing.
fn resolve_capability(capability: &str, options: &Options) -> Result<ArgSlot> {
    if let Some(value) = options.mapper.get(capability) {
        return Ok(ArgSlot::Fixed(rhai::serde::to_dynamic(value)?));
    }
    match capability {
        "ctx" | "context" | "runner" => Ok(ArgSlot::Context),
        "done" | "callback" => Ok(ArgSlot::Done),
        "settings" => Ok(ArgSlot::Settings),
        other => Err(Error::Config(format!(
            "no provider for injected capability '{}'",
            other
        ))),
    }
}

/// Invoke a registered task's callable with its assembled arguments.
///
/// A descriptor without any callable completes immediately. A `native`
/// callable is invoked as-is with no adapted arguments.
pub fn invoke(
    engine: &Engine,
    name: &str,
    task: &RegisteredTask,
    settings: Option<&Dynamic>,
    options: &Options,
) -> Result<Dynamic> {
    if let Some(native) = &task.descriptor.native {
        trace!("invoke: '{}' native pass-through", name);
        let result = native.call::<Dynamic>(engine, &task.ast, ())?;
        return Ok(result);
    }

    let Some(action) = &task.descriptor.action else {
        debug!("invoke: '{}' has no callable, completing immediately", name);
        return Ok(Dynamic::UNIT);
    };

    let done = Done::new();
    let mut args = Vec::with_capacity(task.slots.len());
    for slot in &task.slots {
        args.push(match slot {
            ArgSlot::Context => Dynamic::from_map(context_map(name, options)),
            ArgSlot::Done => Dynamic::from(done.clone()),
            ArgSlot::Settings => settings.cloned().unwrap_or_else(|| {
                debug!("invoke: settings requested but none loaded for '{}'", name);
                Dynamic::from_map(Map::new())
            }),
            ArgSlot::Fixed(value) => value.clone(),
        });
    }

    // Scripted callables have strict arity; surplus conventional arguments
    // are trimmed so a task may declare only the parameters it wants.
    if let Some(expected) = script_param_count(&task.ast, action) {
        if args.len() > expected {
            trace!(
                "invoke: '{}' declares {} parameter(s), trimming extras",
                name,
                expected
            );
            args.truncate(expected);
        }
    }

    trace!("invoke: '{}' with {} argument(s)", name, args.len());
    let result = action.call::<Dynamic>(engine, &task.ast, args)?;
    if done.is_signalled() {
        trace!("invoke: '{}' signalled completion explicitly", name);
    }
    Ok(result)
}

/// Declared parameter count of the script function behind `fn_ptr`, minus
/// any curried captures. `None` when the pointer does not resolve to a
/// function in this AST.
fn script_param_count(ast: &rhai::AST, fn_ptr: &rhai::FnPtr) -> Option<usize> {
    ast.iter_functions()
        .find(|func| func.name == fn_ptr.fn_name())
        .map(|func| func.params.len().saturating_sub(fn_ptr.curry().len()))
}

fn context_map(name: &str, options: &Options) -> Map {
    let mut map = Map::new();
    map.insert("task".into(), name.into());
    map.insert(
        "root".into(),
        options.dir.to_string_lossy().into_owned().into(),
    );
    map.insert("separator".into(), options.separator.clone().into());
    map
}
