//! Task-name derivation: a path relative to the task root becomes a
//! hierarchical task name.

use std::path::Path;

/// Name given to the root directory's own entry point.
pub const DEFAULT_TASK: &str = "default";

/// File stem that stands for its containing directory and is omitted from
/// the name.
const INDEX_STEM: &str = "index";

/// Derive a task name from a path relative to the task root.
///
/// The root's own `index` file maps to [`DEFAULT_TASK`]. Otherwise the
/// directory segments and the file stem are joined with `separator`; an
/// `index` stem is omitted, and when the final two segments are identical
/// (a directory named after its file) they collapse to one. Characters are
/// preserved as-is, no case folding.
pub fn derive_task_name(relative: &Path, separator: &str) -> String {
    let stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let at_root = relative
        .parent()
        .is_none_or(|parent| parent.as_os_str().is_empty());
    if at_root && stem == INDEX_STEM {
        return DEFAULT_TASK.to_string();
    }

    let mut parts: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components())
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();

    if stem != INDEX_STEM {
        parts.push(stem);
    }

    if parts.len() >= 2 && parts[parts.len() - 1] == parts[parts.len() - 2] {
        parts.pop();
    }

    parts.join(separator)
}
