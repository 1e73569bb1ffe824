#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod printer;
pub mod remote;
pub mod settings;
pub mod task;

pub use error::{Error, Result};

use cli::Cli;
use config::Options;
use engine::TaskEngine;
use logger::*;
use manifest::Manifest;
use remote::GistStore;

pub fn run() -> Result<()> {
    run_with_cli(cli::parse_args())
}

pub fn run_with_cli(cli: Cli) -> Result<()> {
    logger::init();
    info!("start");
    debug!("cli args: {:?}", cli);

    let mut options = Options::default();
    if let Some(manifest_path) = &cli.manifest {
        options.manifest = manifest_path.into();
    }
    let manifest = Manifest::load(&options.manifest);
    options.apply_overlay(&manifest.options);

    // CLI flags win over manifest options.
    if let Some(dir) = &cli.dir {
        options.dir = dir.into();
    }
    if let Some(separator) = &cli.separator {
        options.separator = separator.clone();
    }

    let mut engine = TaskEngine::new(options, manifest).with_store(Box::new(GistStore::new()?));
    engine.load_tasks()?;

    dispatcher(cli.cmd, engine)?;
    info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn dispatcher(cmd: Option<cli::Commands>, mut engine: TaskEngine) -> Result<()> {
    debug!("dispatching command: {:?}", cmd);
    match cmd {
        Some(cli::Commands::List) => {
            engine.list_tasks();
            Ok(())
        }
        Some(cli::Commands::Run(opts)) => {
            warn_extra_arguments(&opts.extra);
            run_with_logging(&mut engine, &opts.task)
        }
        Some(cli::Commands::Direct(raw)) => {
            let (task, rest) = raw.split_first().ok_or_else(|| {
                warn!("direct command invoked without a task name");
                Error::Config("Task name is required when omitting the 'run' subcommand.".into())
            })?;
            warn_extra_arguments(rest);
            run_with_logging(&mut engine, task)
        }
        None => {
            if engine.has_default_task() {
                run_with_logging(&mut engine, task::DEFAULT_TASK)
            } else {
                engine.list_tasks();
                Ok(())
            }
        }
    }
}

fn warn_extra_arguments(extra: &[String]) {
    if !extra.is_empty() {
        printer::warn(format!(
            "Ignoring extra arguments: {}. Tasks receive arguments by convention, not \
             from the command line.",
            extra.join(" ")
        ));
    }
}

fn run_with_logging(engine: &mut TaskEngine, task: &str) -> Result<()> {
    info!("executing task '{}'", task);
    engine.run_task(task).map_err(|err| {
        error!("failed to execute task: {}", err);
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_engine() -> TaskEngine {
        let options = Options {
            dir: "no-such-task-dir".into(),
            ..Options::default()
        };
        TaskEngine::new(options, Manifest::empty())
    }

    #[test]
    fn dispatcher_errors_for_direct_without_task_name() {
        let result = dispatcher(Some(cli::Commands::Direct(vec![])), empty_engine());
        let err = result.expect_err("direct without name must fail");
        assert!(err.to_string().contains("Task name is required"));
    }

    #[test]
    fn dispatcher_handles_list_without_panic() {
        dispatcher(Some(cli::Commands::List), empty_engine()).expect("list succeeds");
    }

    #[test]
    fn dispatcher_lists_when_no_command_and_no_default() {
        dispatcher(None, empty_engine()).expect("fallback list succeeds");
    }

    #[test]
    fn dispatcher_surfaces_unknown_task() {
        let cmd = Some(cli::Commands::Run(cli::RunOptions {
            task: "missing".to_string(),
            extra: vec![],
        }));
        let err = dispatcher(cmd, empty_engine()).expect_err("unknown task must fail");
        assert!(matches!(err, Error::UnknownTask(_)));
    }
}
