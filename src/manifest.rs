//! The project manifest: a JSON descriptor at the project root carrying the
//! remote snippet mapping, an optional settings section, and configuration
//! overrides.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::OptionsOverlay;
use crate::logger::{debug, warn};
use crate::settings;

pub struct Manifest {
    /// Full parsed document, kept for settings selection and the transform.
    pub raw: Value,
    /// Task name -> remote snippet id. Read once, never written.
    remote: IndexMap<String, String>,
    /// Configuration overrides declared in the manifest itself.
    pub options: OptionsOverlay,
    /// Directory holding the manifest, used to resolve relative paths.
    pub root: PathBuf,
}

impl Manifest {
    /// Load the manifest. A missing or malformed file is an empty manifest,
    /// matching the settings loader's forgiving contract.
    pub fn load(path: &Path) -> Self {
        let map = settings::load_json_object(path);
        if map.is_empty() {
            debug!("manifest '{}' empty or absent", path.display());
        }
        let raw = Value::Object(map);

        let remote = match raw.get("remote") {
            Some(section) => match serde_json::from_value(section.clone()) {
                Ok(remote) => remote,
                Err(err) => {
                    warn!("manifest 'remote' section ignored: {}", err);
                    IndexMap::new()
                }
            },
            None => IndexMap::new(),
        };

        let options = match raw.get("options") {
            Some(section) => match serde_json::from_value(section.clone()) {
                Ok(options) => options,
                Err(err) => {
                    warn!("manifest 'options' section ignored: {}", err);
                    OptionsOverlay::default()
                }
            },
            None => OptionsOverlay::default(),
        };

        let root = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            raw,
            remote,
            options,
            root,
        }
    }

    pub fn empty() -> Self {
        Self {
            raw: Value::Object(serde_json::Map::new()),
            remote: IndexMap::new(),
            options: OptionsOverlay::default(),
            root: PathBuf::from("."),
        }
    }

    pub fn snippet_id(&self, task: &str) -> Option<&str> {
        self.remote.get(task).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_remote_mapping_and_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"{ "remote": { "lint": "abc123" }, "settings": { "a": 1 } }"#,
        )
        .expect("write manifest");

        let manifest = Manifest::load(&path);
        assert_eq!(manifest.snippet_id("lint"), Some("abc123"));
        assert_eq!(manifest.snippet_id("missing"), None);
        assert_eq!(manifest.root, dir.path());
    }

    #[test]
    fn missing_manifest_is_empty() {
        let manifest = Manifest::load(Path::new("/nonexistent/tasks.json"));
        assert!(manifest.snippet_id("anything").is_none());
        assert_eq!(manifest.raw, serde_json::json!({}));
    }

    #[test]
    fn malformed_remote_section_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, r#"{ "remote": ["not", "a", "map"] }"#).expect("write manifest");

        let manifest = Manifest::load(&path);
        assert!(manifest.snippet_id("anything").is_none());
    }
}
