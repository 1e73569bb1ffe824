//! The task engine: owns the rhai engine, the registry, the options, and the
//! collaborators used for dynamic task loading.

use rhai::packages::Package;
use rhai::{Dynamic, Engine};
use rhai_process::{Config, ProcessPackage};

use super::loader;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::logger::{debug, trace, warn};
use crate::manifest::Manifest;
use crate::printer::{self, TaskLine};
use crate::remote::{self, CargoInstaller, Installer, SnippetStore};
use crate::settings::{self, SettingsTransform};
use crate::task::{self, ArgSlot, TaskRegistry, DEFAULT_TASK};

pub struct TaskEngine {
    pub engine: Engine,
    pub registry: TaskRegistry,
    pub options: Options,
    pub manifest: Manifest,
    pub(crate) store: Option<Box<dyn SnippetStore>>,
    pub(crate) installer: Box<dyn Installer>,
    settings_transform: Option<Box<SettingsTransform>>,
    settings: Option<Dynamic>,
    settings_loaded: bool,
    /// Names currently being run, innermost last. Guards dependency cycles.
    chain: Vec<String>,
}

impl TaskEngine {
    pub fn new(options: Options, manifest: Manifest) -> Self {
        let mut engine = Engine::new();
        task::register_done_type(&mut engine);
        ProcessPackage::new(Config::default()).register_into_engine(&mut engine);

        let installer = Box::new(CargoInstaller::new(options.install_policy, &manifest.root));

        Self {
            engine,
            registry: TaskRegistry::new(),
            options,
            manifest,
            store: None,
            installer,
            settings_transform: None,
            settings: None,
            settings_loaded: false,
            chain: Vec::new(),
        }
    }

    pub fn with_store(mut self, store: Box<dyn SnippetStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_installer(mut self, installer: Box<dyn Installer>) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_settings_transform(mut self, transform: Box<SettingsTransform>) -> Self {
        self.settings_transform = Some(transform);
        self
    }

    /// Scan the task directory and register everything found.
    pub fn load_tasks(&mut self) -> Result<()> {
        loader::load_tasks(self)
    }

    /// Register a single persisted script under `name` (or an alias).
    pub fn register_script(&mut self, name: &str, path: &std::path::Path) -> Result<String> {
        loader::register_file(self, name, path)
    }

    pub fn has_default_task(&self) -> bool {
        self.registry.contains(DEFAULT_TASK)
    }

    /// Run a task: its dependencies first, in declared order, then the task
    /// itself. A name that is not registered falls through to the remote
    /// importer when the manifest maps it, else fails as unknown.
    pub fn run_task(&mut self, name: &str) -> Result<()> {
        debug!("run_task('{}')", name);

        if !self.registry.contains(name) {
            if self.manifest.snippet_id(name).is_some() {
                remote::import_task(self, name, true)?;
                return Ok(());
            }
            warn!("run_task: '{}' unknown", name);
            return Err(Error::UnknownTask(name.to_string()));
        }

        if self.chain.iter().any(|running| running == name) {
            return Err(Error::DependencyCycle(name.to_string()));
        }

        self.chain.push(name.to_string());
        let result = self.run_chain(name);
        self.chain.pop();
        result
    }

    fn run_chain(&mut self, name: &str) -> Result<()> {
        let deps = self
            .registry
            .get(name)
            .map(|task| task.descriptor.deps.clone())
            .unwrap_or_default();
        for dep in &deps {
            trace!("run_chain: '{}' depends on '{}'", name, dep);
            self.run_task(dep)?;
        }
        self.invoke_registered(name)
    }

    /// Invoke one registered task directly, without its dependency chain.
    pub(crate) fn invoke_registered(&mut self, name: &str) -> Result<()> {
        let task = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownTask(name.to_string()))?;
        // An injected settings slot needs the settings even when the global
        // load_settings option is off; that option only governs the
        // conventional third argument.
        let injected = task
            .slots
            .iter()
            .any(|slot| matches!(slot, ArgSlot::Settings));
        self.ensure_settings(injected)?;
        let _ = task::invoke(
            &self.engine,
            name,
            &task,
            self.settings.as_ref(),
            &self.options,
        )?;
        Ok(())
    }

    fn ensure_settings(&mut self, required: bool) -> Result<()> {
        if !(self.options.load_settings || required) || self.settings_loaded {
            return Ok(());
        }
        let merged = settings::aggregate(
            &self.manifest.raw,
            self.options.settings_id.as_deref(),
            &self.manifest.root,
            &self.options.local_settings,
            self.settings_transform.as_deref(),
        );
        self.settings = Some(rhai::serde::to_dynamic(merged)?);
        self.settings_loaded = true;
        debug!("settings loaded once for this invocation");
        Ok(())
    }

    pub fn list_tasks(&self) {
        if self.registry.is_empty() {
            printer::info("No tasks registered.");
            return;
        }
        let lines: Vec<TaskLine> = self
            .registry
            .iter()
            .map(|(name, task)| TaskLine {
                name: name.clone(),
                deps: task.descriptor.deps.clone(),
            })
            .collect();
        printer::print_task_list(&lines);
    }
}
