//! Runtime configuration. Defaults here, overridden first by the manifest's
//! `options` section and then by CLI flags.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// What to do when the requirement installer exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallPolicy {
    /// A non-zero exit fails the import chain.
    #[default]
    FailOnError,
    /// Exit codes are ignored and the chain proceeds.
    Ignore,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// Directory scanned recursively for task scripts.
    pub dir: PathBuf,
    /// Separator joining path segments into task names.
    pub separator: String,
    /// Prepend the runner context to task arguments.
    pub pass_context: bool,
    /// Append a completion handle to task arguments.
    pub pass_callback: bool,
    /// Load and append the merged settings object.
    pub load_settings: bool,
    /// Manifest key holding base settings; blank selects the whole manifest.
    pub settings_id: Option<String>,
    /// Override files merged on top of the base settings, in order.
    pub local_settings: Vec<PathBuf>,
    /// Switch conventional arguments off in favour of per-task `inject` lists.
    pub dynamic_inclusion: bool,
    /// Capability name -> constant value, consulted before built-in providers.
    pub mapper: IndexMap<String, Value>,
    /// Deprecated fixed argument list overriding all assembly.
    pub arguments: Option<Vec<Value>>,
    /// Path to the project manifest.
    pub manifest: PathBuf,
    pub install_policy: InstallPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tasks"),
            separator: ":".to_string(),
            pass_context: true,
            pass_callback: true,
            load_settings: false,
            settings_id: Some("settings".to_string()),
            local_settings: vec![PathBuf::from("local.json")],
            dynamic_inclusion: false,
            mapper: IndexMap::new(),
            arguments: None,
            manifest: PathBuf::from("tasks.json"),
            install_policy: InstallPolicy::default(),
        }
    }
}

/// Partial options as they appear in the manifest's `options` section; only
/// present fields override the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OptionsOverlay {
    pub dir: Option<PathBuf>,
    pub separator: Option<String>,
    pub pass_context: Option<bool>,
    pub pass_callback: Option<bool>,
    pub load_settings: Option<bool>,
    pub settings_id: Option<String>,
    pub local_settings: Option<Vec<PathBuf>>,
    pub dynamic_inclusion: Option<bool>,
    pub mapper: Option<IndexMap<String, Value>>,
    pub arguments: Option<Vec<Value>>,
    pub install_policy: Option<InstallPolicy>,
}

impl Options {
    pub fn apply_overlay(&mut self, overlay: &OptionsOverlay) {
        if let Some(dir) = &overlay.dir {
            self.dir = dir.clone();
        }
        if let Some(separator) = &overlay.separator {
            self.separator = separator.clone();
        }
        if let Some(pass_context) = overlay.pass_context {
            self.pass_context = pass_context;
        }
        if let Some(pass_callback) = overlay.pass_callback {
            self.pass_callback = pass_callback;
        }
        if let Some(load_settings) = overlay.load_settings {
            self.load_settings = load_settings;
        }
        if let Some(settings_id) = &overlay.settings_id {
            self.settings_id = Some(settings_id.clone());
        }
        if let Some(local_settings) = &overlay.local_settings {
            self.local_settings = local_settings.clone();
        }
        if let Some(dynamic_inclusion) = overlay.dynamic_inclusion {
            self.dynamic_inclusion = dynamic_inclusion;
        }
        if let Some(mapper) = &overlay.mapper {
            self.mapper = mapper.clone();
        }
        if let Some(arguments) = &overlay.arguments {
            self.arguments = Some(arguments.clone());
        }
        if let Some(install_policy) = overlay.install_policy {
            self.install_policy = install_policy;
        }
    }
}
