//! Settings aggregation: a deep merge of the manifest's settings section with
//! any number of local override files.
//!
//! Merge rules: arrays are unioned and de-duplicated in order of first
//! appearance, objects merge recursively, scalars are overwritten by later
//! sources. A scalar met by an incoming array is promoted to a one-element
//! array before the union. Missing or malformed source files count as empty
//! objects, never as errors, so settings stay optional.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::{debug, trace};

/// Transform applied to the merged settings before use. Receives the merged
/// object, the raw sources in merge order, and the full manifest document.
pub type SettingsTransform = dyn Fn(Value, &[Value], &Value) -> Value;

pub fn merge(to: &mut Map<String, Value>, from: &Map<String, Value>) {
    for (key, incoming) in from {
        match incoming {
            Value::Array(items) => {
                let existing = match to.get(key) {
                    Some(Value::Array(prior)) => prior.clone(),
                    Some(Value::Object(_)) | Some(Value::Null) | None => Vec::new(),
                    Some(scalar) => vec![scalar.clone()],
                };
                to.insert(key.clone(), Value::Array(unique(existing, items)));
            }
            Value::Object(incoming_map) => {
                if !matches!(to.get(key), Some(Value::Object(_))) {
                    to.insert(key.clone(), Value::Object(Map::new()));
                }
                if let Some(Value::Object(target)) = to.get_mut(key) {
                    merge(target, incoming_map);
                }
            }
            scalar => {
                to.insert(key.clone(), scalar.clone());
            }
        }
    }
}

fn unique(existing: Vec<Value>, incoming: &[Value]) -> Vec<Value> {
    let mut result = Vec::with_capacity(existing.len() + incoming.len());
    for item in existing.into_iter().chain(incoming.iter().cloned()) {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

/// Read a JSON file as an object, yielding an empty object when the file is
/// missing, unreadable, malformed, or not an object.
pub fn load_json_object(path: &Path) -> Map<String, Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            trace!("load_json_object: '{}' unreadable ({})", path.display(), err);
            return Map::new();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            debug!(
                "load_json_object: '{}' is not a JSON object, treating as empty",
                path.display()
            );
            Map::new()
        }
    }
}

/// Select the base settings section from the manifest document. A blank or
/// absent id selects the whole manifest.
fn base_section(manifest: &Value, settings_id: Option<&str>) -> Map<String, Value> {
    let section = match settings_id {
        None => Some(manifest),
        Some(id) if id.is_empty() => Some(manifest),
        Some(id) => manifest.get(id),
    };
    match section {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Build the settings object: manifest section first, then each local
/// override in listed order, each deep-merged on top, then the optional
/// transform.
pub fn aggregate(
    manifest: &Value,
    settings_id: Option<&str>,
    project_root: &Path,
    local_settings: &[PathBuf],
    transform: Option<&SettingsTransform>,
) -> Value {
    let base = base_section(manifest, settings_id);
    let mut sources = vec![Value::Object(base)];
    for local in local_settings {
        let path = if local.is_absolute() {
            local.clone()
        } else {
            project_root.join(local)
        };
        sources.push(Value::Object(load_json_object(&path)));
    }

    let mut merged = Map::new();
    for source in &sources {
        if let Value::Object(map) = source {
            merge(&mut merged, map);
        }
    }

    let merged = Value::Object(merged);
    match transform {
        Some(transform) => transform(merged, &sources, manifest),
        None => merged,
    }
}
