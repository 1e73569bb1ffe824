//! The task registry: the single owned table of registered tasks. Everything
//! that registers or queries tasks goes through a borrowed reference to this
//! object; there is no ambient global state.

use indexmap::IndexMap;
use rhai::AST;
use std::sync::Arc;

use super::descriptor::TaskDescriptor;
use super::wrapper::ArgSlot;
use crate::logger::trace;
use crate::printer;

#[derive(Clone)]
pub struct RegisteredTask {
    pub descriptor: TaskDescriptor,
    /// AST of the defining script; required to invoke the task's callables.
    pub ast: Arc<AST>,
    /// Argument slots resolved at registration time.
    pub slots: Vec<ArgSlot>,
}

#[derive(Default)]
pub struct TaskRegistry {
    tasks: IndexMap<String, RegisteredTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTask> {
        self.tasks.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisteredTask)> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Register under `name`, or under a collision-avoiding alias when the
    /// name is already taken. Returns the name actually used.
    pub fn insert_with_alias(&mut self, name: &str, task: RegisteredTask) -> String {
        if !self.tasks.contains_key(name) {
            trace!("registry: inserting '{}'", name);
            self.tasks.insert(name.to_string(), task);
            return name.to_string();
        }

        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", name, suffix);
            if !self.tasks.contains_key(&candidate) {
                printer::warn(format!(
                    "Task name '{}' is already registered; using '{}'.",
                    name, candidate
                ));
                self.tasks.insert(candidate.clone(), task);
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
pub(crate) fn registered_for_test() -> RegisteredTask {
    RegisteredTask {
        descriptor: TaskDescriptor::default(),
        ast: Arc::new(AST::empty()),
        slots: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_come_name() {
        let mut registry = TaskRegistry::new();
        let used = registry.insert_with_alias("build", registered_for_test());
        assert_eq!(used, "build");
        assert!(registry.contains("build"));
    }

    #[test]
    fn collision_generates_numbered_alias() {
        let mut registry = TaskRegistry::new();
        registry.insert_with_alias("deploy", registered_for_test());
        let second = registry.insert_with_alias("deploy", registered_for_test());
        let third = registry.insert_with_alias("deploy", registered_for_test());
        assert_eq!(second, "deploy-2");
        assert_eq!(third, "deploy-3");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut registry = TaskRegistry::new();
        for name in ["clean", "build", "deploy"] {
            registry.insert_with_alias(name, registered_for_test());
        }
        let names: Vec<&str> = registry.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["clean", "build", "deploy"]);
    }
}
