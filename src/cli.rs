use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "taskdir",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
pub struct Cli {
    /// Directory scanned recursively for task scripts (defaults to "tasks")
    #[arg(short, long, value_name = "DIR", global = true)]
    pub dir: Option<String>,

    /// Project manifest path (defaults to "tasks.json")
    #[arg(short, long, value_name = "FILE", global = true)]
    pub manifest: Option<String>,

    /// Separator joining path segments into task names (defaults to ":")
    #[arg(short, long, value_name = "SEP", global = true)]
    pub separator: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the registered tasks and their dependencies
    List,
    /// Run a task (`taskdir run -h` for details)
    Run(RunOptions),
    /// Execute a task directly (shorthand for `taskdir run <task>`)
    #[command(external_subcommand)]
    Direct(Vec<String>),
}

#[derive(Args, Debug)]
pub struct RunOptions {
    /// Task name to execute
    #[arg(name = "TASK_NAME")]
    pub task: String,

    /// Trailing arguments, accepted for compatibility and ignored
    #[arg(name = "ARGS", allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from<I, T>(items: I) -> Cli
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::parse_from(items)
    }

    #[test]
    fn parse_list_with_global_flags() {
        let cli = parse_from(["taskdir", "-d", "gulp-tasks", "-m", "pkg.json", "list"]);
        assert_eq!(cli.dir.as_deref(), Some("gulp-tasks"));
        assert_eq!(cli.manifest.as_deref(), Some("pkg.json"));
        assert!(matches!(cli.cmd, Some(Commands::List)));
    }

    #[test]
    fn parse_run_with_task_name() {
        let cli = parse_from(["taskdir", "--separator", ".", "run", "build.css"]);
        assert_eq!(cli.separator.as_deref(), Some("."));
        match cli.cmd.expect("run command") {
            Commands::Run(opts) => assert_eq!(opts.task, "build.css"),
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn parse_run_accepts_trailing_arguments() {
        let cli = parse_from(["taskdir", "run", "build", "--fast", "now"]);
        match cli.cmd.expect("run command") {
            Commands::Run(opts) => {
                assert_eq!(opts.task, "build");
                assert_eq!(opts.extra, vec!["--fast".to_string(), "now".to_string()]);
            }
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn parse_direct_subcommand() {
        let cli = parse_from(["taskdir", "deploy"]);
        match cli.cmd.expect("direct command") {
            Commands::Direct(values) => assert_eq!(values, vec!["deploy".to_string()]),
            other => panic!("expected direct command, got {:?}", other),
        }
    }

    #[test]
    fn parse_no_subcommand() {
        let cli = parse_from(["taskdir"]);
        assert!(cli.cmd.is_none());
    }
}
