//! Directory traversal: every task script under the configured root becomes
//! a registered task, named after its path.

use rhai::Dynamic;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use super::core::TaskEngine;
use crate::error::Result;
use crate::logger::{debug, info, trace, warn};
use crate::task::{assemble_slots, derive_task_name, normalize, RegisteredTask};

const SCRIPT_EXTENSION: &str = "rhai";

pub(crate) fn load_tasks(engine: &mut TaskEngine) -> Result<()> {
    let root = engine.options.dir.clone();
    if !root.is_dir() {
        warn!(
            "task directory '{}' not found, nothing scanned",
            root.display()
        );
        return Ok(());
    }

    let mut scripts = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION) {
            debug!("skipping non-script file {}", path.display());
            continue;
        }
        scripts.push(path);
    }

    for path in scripts {
        let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
        let name = derive_task_name(&relative, &engine.options.separator);
        let registered = register_file(engine, &name, &path)?;
        trace!("scan: {} -> '{}'", relative.display(), registered);
    }

    info!(
        "registered {} task(s) from {}",
        engine.registry.len(),
        root.display()
    );
    Ok(())
}

/// Compile and evaluate one task script, normalize its result, and register
/// it. Returns the name actually used (an alias on collision).
pub(crate) fn register_file(engine: &mut TaskEngine, name: &str, path: &Path) -> Result<String> {
    debug!("loading task script {}", path.display());
    let ast = engine.engine.compile_file(path.to_path_buf())?;
    let value = engine.engine.eval_ast::<Dynamic>(&ast)?;
    let descriptor = normalize(value);
    let slots = assemble_slots(&descriptor, &engine.options)?;
    let task = RegisteredTask {
        descriptor,
        ast: Arc::new(ast),
        slots,
    };
    Ok(engine.registry.insert_with_alias(name, task))
}
