//! Dynamic task loading: materialize a task that exists only as a remote
//! snippet, then run it.
//!
//! The flow is an explicit state machine so every failure point is
//! auditable: LOOKUP -> FETCH -> PERSIST -> REGISTER -> INSTALL -> RECURSE
//! -> RUN. A task is either fully materialized and run, or the whole chain
//! fails; there is no partial success. Dependencies are imported strictly
//! one after another because installation mutates shared package state.

use std::fs;
use std::path::PathBuf;

use crate::engine::TaskEngine;
use crate::error::{Error, Result};
use crate::logger::{debug, info};

enum Step {
    Lookup,
    Fetch { snippet_id: String },
    Persist { source: String },
    Register { script_path: PathBuf },
    Install { registered: String },
    Recurse { registered: String },
    Run { registered: String },
}

impl Step {
    fn label(&self) -> &'static str {
        match self {
            Step::Lookup => "lookup",
            Step::Fetch { .. } => "fetch",
            Step::Persist { .. } => "persist",
            Step::Register { .. } => "register",
            Step::Install { .. } => "install",
            Step::Recurse { .. } => "recurse",
            Step::Run { .. } => "run",
        }
    }
}

/// Import `name` through the state machine, running it afterwards when
/// `run` is set (dependencies are imported but not run). Returns the name
/// the task was registered under.
pub fn import_task(engine: &mut TaskEngine, name: &str, run: bool) -> Result<String> {
    let mut step = Step::Lookup;
    loop {
        debug!("import '{}': entering {}", name, step.label());
        step = match step {
            Step::Lookup => match engine.manifest.snippet_id(name) {
                Some(id) => Step::Fetch {
                    snippet_id: id.to_string(),
                },
                None => return Err(Error::UnknownTask(name.to_string())),
            },

            Step::Fetch { snippet_id } => {
                let store = engine.store.as_deref().ok_or_else(|| {
                    Error::Config(format!(
                        "task '{}' maps to snippet '{}' but no snippet store is configured",
                        name, snippet_id
                    ))
                })?;
                let content = store.fetch(&snippet_id)?;
                let leaf = name
                    .rsplit(engine.options.separator.as_str())
                    .next()
                    .unwrap_or(name);
                let source = content
                    .primary(leaf)
                    .ok_or_else(|| Error::EmptySnippet(snippet_id.clone()))?
                    .to_string();
                Step::Persist { source }
            }

            Step::Persist { source } => {
                let script_path = engine.options.dir.join(format!("{}.rhai", name));
                if let Some(parent) = script_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&script_path, source)?;
                debug!("import '{}': persisted to {}", name, script_path.display());
                Step::Register { script_path }
            }

            Step::Register { script_path } => {
                let registered = engine.register_script(name, &script_path)?;
                Step::Install { registered }
            }

            Step::Install { registered } => {
                let requires = engine
                    .registry
                    .get(&registered)
                    .map(|task| task.descriptor.requires.clone())
                    .unwrap_or_default();
                if !requires.is_empty() {
                    engine.installer.install(&requires)?;
                }
                Step::Recurse { registered }
            }

            Step::Recurse { registered } => {
                let deps = engine
                    .registry
                    .get(&registered)
                    .map(|task| task.descriptor.deps.clone())
                    .unwrap_or_default();
                for dep in deps {
                    if !engine.registry.contains(&dep)
                        && engine.manifest.snippet_id(&dep).is_some()
                    {
                        import_task(engine, &dep, false)?;
                    }
                }
                if run {
                    Step::Run { registered }
                } else {
                    info!("import '{}': registered as '{}'", name, registered);
                    return Ok(registered);
                }
            }

            Step::Run { registered } => {
                // Direct invocation, bypassing the dependency chain: the
                // dependencies were just materialized, not scheduled.
                engine.invoke_registered(&registered)?;
                info!("import '{}': ran as '{}'", name, registered);
                return Ok(registered);
            }
        };
    }
}
