//! Normalization of a task script's eval result into a canonical descriptor.
//!
//! A task file evaluates either to a bare callable or to a map:
//!
//! ```rhai
//! // bare callable
//! |ctx, done| { print("building"); done.signal(); }
//!
//! // object form
//! #{
//!     action: || print("building"),
//!     deps: ["clean"],
//!     requires: #{ "ripgrep": "14.1" },
//!     inject: ["settings"],
//! }
//! ```

use indexmap::IndexMap;
use rhai::{Dynamic, FnPtr, Map};

use crate::logger::{debug, warn};
use crate::printer;

#[derive(Debug, Clone, Default)]
pub struct TaskDescriptor {
    /// Wrapped callable, invoked with the assembled argument list.
    pub action: Option<FnPtr>,
    /// Pass-through callable registered without argument adaptation.
    pub native: Option<FnPtr>,
    /// Ordered dependency task names.
    pub deps: Vec<String>,
    /// Externally required package versions, installed before a remote task
    /// runs.
    pub requires: IndexMap<String, String>,
    /// Capability names resolved through the provider table; replaces the
    /// conventional arguments when present.
    pub inject: Option<Vec<String>>,
}

/// Coerce a script's eval result into a descriptor. A bare callable becomes
/// a descriptor with that action, an empty dependency list, and no external
/// requirements. Anything else unrecognised yields an empty descriptor whose
/// invocation completes immediately.
pub fn normalize(value: Dynamic) -> TaskDescriptor {
    if value.is::<FnPtr>() {
        let action = value.cast::<FnPtr>();
        return TaskDescriptor {
            action: Some(action),
            ..TaskDescriptor::default()
        };
    }

    let Some(map) = value.try_cast::<Map>() else {
        debug!("task script evaluated to neither a callable nor a map");
        return TaskDescriptor::default();
    };

    let mut descriptor = TaskDescriptor {
        action: fn_field(&map, "action"),
        native: fn_field(&map, "native"),
        ..TaskDescriptor::default()
    };

    if let Some(deps) = map.get("deps") {
        descriptor.deps = string_list(deps);
    } else if let Some(dep) = map.get("dep") {
        let message = "The 'dep' field is deprecated and will be removed \
                       in the next major version. Use 'deps' instead.";
        warn!("{}", message);
        printer::warn(message);
        descriptor.deps = string_list(dep);
    }

    if let Some(requires) = map.get("requires").and_then(|d| d.read_lock::<Map>()) {
        for (key, value) in requires.iter() {
            descriptor
                .requires
                .insert(key.to_string(), value.to_string());
        }
    }

    if let Some(inject) = map.get("inject") {
        descriptor.inject = Some(string_list(inject));
    }

    descriptor
}

fn fn_field(map: &Map, key: &str) -> Option<FnPtr> {
    map.get(key).cloned().and_then(|d| d.try_cast::<FnPtr>())
}

/// Coerce a value into a list of strings: an array of its elements' string
/// forms, or a single string wrapped in a one-element list.
fn string_list(value: &Dynamic) -> Vec<String> {
    if let Some(array) = value.read_lock::<rhai::Array>() {
        return array.iter().map(|item| item.to_string()).collect();
    }
    if value.is_string() {
        return vec![value.to_string()];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::Engine;

    fn eval(script: &str) -> Dynamic {
        Engine::new().eval::<Dynamic>(script).expect("eval script")
    }

    #[test]
    fn bare_callable_gets_empty_deps_and_requires() {
        let descriptor = normalize(eval("|| 42"));
        assert!(descriptor.action.is_some());
        assert!(descriptor.deps.is_empty());
        assert!(descriptor.requires.is_empty());
        assert!(descriptor.inject.is_none());
    }

    #[test]
    fn map_form_reads_all_fields() {
        let descriptor = normalize(eval(
            r#"#{
                action: || 1,
                deps: ["clean", "lint"],
                requires: #{ "ripgrep": "14.1" },
                inject: ["settings"],
            }"#,
        ));
        assert!(descriptor.action.is_some());
        assert_eq!(descriptor.deps, vec!["clean", "lint"]);
        assert_eq!(
            descriptor.requires.get("ripgrep").map(String::as_str),
            Some("14.1")
        );
        assert_eq!(descriptor.inject, Some(vec!["settings".to_string()]));
    }

    #[test]
    fn deprecated_dep_string_is_coerced_to_list() {
        let descriptor = normalize(eval(r#"#{ dep: "clean" }"#));
        assert_eq!(descriptor.deps, vec!["clean"]);
    }

    #[test]
    fn deps_take_precedence_over_dep() {
        let descriptor = normalize(eval(r#"#{ deps: ["a"], dep: "b" }"#));
        assert_eq!(descriptor.deps, vec!["a"]);
    }

    #[test]
    fn map_without_action_has_none() {
        let descriptor = normalize(eval(r#"#{ deps: ["clean"] }"#));
        assert!(descriptor.action.is_none());
        assert_eq!(descriptor.deps, vec!["clean"]);
    }

    #[test]
    fn unrecognised_value_yields_empty_descriptor() {
        let descriptor = normalize(eval("42"));
        assert!(descriptor.action.is_none());
        assert!(descriptor.deps.is_empty());
    }
}
